pub mod input;
pub mod models;
pub mod patch;
pub mod repository;
pub mod social;

pub use models::{
    About, Certificate, Entity, Project, Skill, SkillCategory, SocialLink, TimelineEvent,
    TimelineKind,
};
pub use repository::{ContentRepository, Saved, Snapshot};
pub use social::SocialIcon;
