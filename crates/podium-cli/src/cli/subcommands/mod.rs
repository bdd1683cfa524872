mod project;

pub use project::ProjectCommands;
