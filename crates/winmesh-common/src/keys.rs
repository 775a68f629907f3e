//! Store keys shared by every process on the medium.

/// Key holding the string-encoded registry of live windows.
pub const WINDOWS: &str = "windows";

/// Key holding the string-encoded id counter.
pub const COUNT: &str = "count";
