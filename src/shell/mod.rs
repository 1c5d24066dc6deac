//! Process execution and shell environment helpers.

pub mod command;
pub mod mock;
pub mod path;
pub mod platform;

pub use command::{CommandResult, CommandSpec, ProcessRunner, SystemRunner};
pub use mock::MockRunner;
pub use path::{is_executable, parse_system_path, path_contains, resolve_tool_path};
pub use platform::{is_ci, is_elevated, ShellType};
