use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Length of the slide-in animation.
pub const ENTRY_ANIMATION: Duration = Duration::from_millis(300);
/// Time from creation until the exit animation starts.
pub const DISPLAY_DURATION: Duration = Duration::from_millis(3000);
/// Length of the slide-out animation.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

/// Toast severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    #[default]
    Info,
    /// Completed action.
    Success,
    /// Failed action.
    Error,
}

impl Severity {
    /// Background color of the toast as a CSS hex string.
    #[must_use]
    pub const fn hex_color(self) -> &'static str {
        match self {
            Self::Success => "#10B981",
            Self::Error => "#EF4444",
            Self::Info => "#3B82F6",
        }
    }

    /// Background color of the toast as RGB components.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Success => (0x10, 0xB9, 0x81),
            Self::Error => (0xEF, 0x44, 0x44),
            Self::Info => (0x3B, 0x82, 0xF6),
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Unique toast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Generates a random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a toast, derived from the time since creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationPhase {
    /// Sliding in; progress runs from 0.0 to 1.0.
    Entering(f32),
    /// Fully shown.
    Visible,
    /// Sliding out; progress runs from 0.0 to 1.0.
    Exiting(f32),
    /// Gone from the surface.
    Removed,
}

impl NotificationPhase {
    /// Fraction of the toast width hidden off the right edge.
    #[must_use]
    pub fn offset_fraction(self) -> f32 {
        match self {
            Self::Entering(progress) => 1.0 - progress,
            Self::Visible => 0.0,
            Self::Exiting(progress) => progress,
            Self::Removed => 1.0,
        }
    }
}

/// A single toast.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Identifier.
    pub id: NotificationId,
    /// Severity, which picks the color.
    pub severity: Severity,
    /// Displayed text.
    pub message: String,
    /// Creation time; phases are measured from here.
    pub created_at: Instant,
}

impl Notification {
    /// Creates a toast timestamped now.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    /// Total time the toast stays mounted.
    #[must_use]
    pub const fn lifetime() -> Duration {
        DISPLAY_DURATION.saturating_add(EXIT_ANIMATION)
    }

    /// Phase at `now`.
    #[must_use]
    pub fn phase_at(&self, now: Instant) -> NotificationPhase {
        phase_after(now.saturating_duration_since(self.created_at))
    }

    /// Phase at the current instant.
    #[must_use]
    pub fn phase(&self) -> NotificationPhase {
        self.phase_at(Instant::now())
    }
}

/// Maps time since creation onto the toast lifecycle.
#[must_use]
pub fn phase_after(elapsed: Duration) -> NotificationPhase {
    if elapsed < ENTRY_ANIMATION {
        NotificationPhase::Entering(elapsed.as_secs_f32() / ENTRY_ANIMATION.as_secs_f32())
    } else if elapsed < DISPLAY_DURATION {
        NotificationPhase::Visible
    } else if elapsed < Notification::lifetime() {
        let into_exit = elapsed.saturating_sub(DISPLAY_DURATION);
        NotificationPhase::Exiting(into_exit.as_secs_f32() / EXIT_ANIMATION.as_secs_f32())
    } else {
        NotificationPhase::Removed
    }
}
