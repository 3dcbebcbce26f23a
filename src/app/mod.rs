// Terminal front end: text rendering, stdin prompt and the interactive shell.

pub mod prompt;
pub mod render;
pub mod shell;
