use core::fmt;

use crate::error::NoticeError;

/// Optional link and message served by the remote configuration service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
	pub link: Option<String>,
	pub message: Option<String>,
}

/// Remote configuration fetch, performed once when the welcome overlay mounts.
pub trait NoticeSource: Send {
	fn fetch_notice(&mut self) -> Result<Notice, NoticeError>;
}

/// A notice source that always returns the same notice.
#[derive(Debug, Clone, Default)]
pub struct StaticNotice(pub Notice);

impl NoticeSource for StaticNotice {
	fn fetch_notice(&mut self) -> Result<Notice, NoticeError> {
		Ok(self.0.clone())
	}
}

/// Opaque navigation target understood by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(pub String);

impl Destination {
	pub fn new(target: impl Into<String>) -> Self {
		Self(target.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Destination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Host application navigation.
pub trait Navigator: Send {
	fn navigate(&mut self, destination: &Destination);
}
