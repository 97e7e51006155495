//! `ldap3`-backed implementation of the ensync directory abstraction.
//!
//! Connection lifecycle (connect, bind, unbind) lives here; the core only
//! ever sees a bound [`ensync_core::Directory`].

mod directory;
pub use directory::LdapDirectory;
