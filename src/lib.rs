//! Limpeza David installer.
//!
//! Installs the Limpeza David system cleaner for the current user on any
//! Linux distribution that ships apt, dnf, yum, pacman or zypper. A run
//! makes sure git, python3, pip and tkinter are present, clones the
//! application, writes a command-line launcher and desktop shortcuts, and
//! verifies the result. Running it again is safe: present dependencies are
//! left alone and the application is reinstalled from a fresh clone.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - The immutable install context and path layout
//! - [`desktop`] - Desktop entries and trust marking
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Source cloning and HTTP downloads
//! - [`launcher`] - Command-line launcher and PATH setup
//! - [`requirements`] - Package manager profiles and dependency installation
//! - [`runner`] - The install sequence
//! - [`shell`] - Process execution and platform detection
//! - [`ui`] - Spinners, prompts, and terminal output
//! - [`verify`] - Post-install checks
//!
//! # Example
//!
//! ```
//! use limpeza_installer::requirements::{PackageManagerKind, PackageManagerProfile, Privilege};
//!
//! let profile = PackageManagerProfile::for_kind(PackageManagerKind::Pacman, Privilege::Root);
//! assert_eq!(
//!     profile.install_command(&["git"]).to_string(),
//!     "pacman -S --noconfirm --needed git"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod desktop;
pub mod error;
pub mod fetch;
pub mod launcher;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;
pub mod verify;

pub use error::{InstallerError, Result};
