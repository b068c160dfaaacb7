use chrono::{DateTime, Offset, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use sn_core::{Category, Destination};

/// Daily `[start_hour, end_hour)` window on the wall clock of a time zone,
/// so it follows daylight saving changes.
///
/// `start > end` wraps midnight. `start == end` is an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietWindow {
    start_hour: u32,
    end_hour: u32,
    zone: Tz,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuietWindowInfo {
    pub start_hour: u32,
    pub end_hour: u32,
    pub timezone: String,
    /// Offset in effect when the info was taken
    pub utc_offset_seconds: i32,
}

impl QuietWindow {
    pub fn new(start_hour: u32, end_hour: u32, zone: Tz) -> Result<Self, String> {
        if start_hour > 23 || end_hour > 23 {
            return Err(format!("Quiet hours must be within 0..=23, got {}..{}", start_hour, end_hour));
        }
        Ok(Self { start_hour, end_hour, zone })
    }

    /// Same as [`QuietWindow::new`] with an IANA zone name such as `Europe/Moscow`.
    pub fn in_zone(start_hour: u32, end_hour: u32, zone: &str) -> Result<Self, String> {
        let zone: Tz = zone
            .parse()
            .map_err(|e| format!("Unknown time zone '{}': {}", zone, e))?;
        Self::new(start_hour, end_hour, zone)
    }

    pub fn is_quiet_hour(&self, hour: u32) -> bool {
        if self.start_hour == self.end_hour {
            false
        } else if self.start_hour < self.end_hour {
            (self.start_hour..self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    pub fn is_quiet(&self, now: DateTime<Utc>) -> bool {
        self.is_quiet_hour(now.with_timezone(&self.zone).hour())
    }

    pub fn info(&self) -> QuietWindowInfo {
        self.info_at(Utc::now())
    }

    pub fn info_at(&self, now: DateTime<Utc>) -> QuietWindowInfo {
        QuietWindowInfo {
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            timezone: self.zone.name().to_string(),
            utc_offset_seconds: now.with_timezone(&self.zone).offset().fix().local_minus_utc(),
        }
    }
}

/// Category to destination routing. Missing vulnerability routing falls back to the general one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationMap {
    pub general: Destination,
    pub vulnerability: Option<Destination>,
}

impl DestinationMap {
    pub fn new(general: Destination) -> Self {
        Self { general, vulnerability: None }
    }

    pub fn with_vulnerability(mut self, destination: Option<Destination>) -> Self {
        self.vulnerability = destination;
        self
    }

    pub fn for_category(&self, category: Category) -> Destination {
        match category {
            Category::Vulnerability => self.vulnerability.unwrap_or(self.general),
            Category::General => self.general,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryGate {
    window: QuietWindow,
    destinations: DestinationMap,
}

impl DeliveryGate {
    pub fn new(window: QuietWindow, destinations: DestinationMap) -> Self {
        Self { window, destinations }
    }

    pub fn is_quiet(&self, now: DateTime<Utc>) -> bool {
        self.window.is_quiet(now)
    }

    pub fn destination_for(&self, category: Category) -> Destination {
        self.destinations.for_category(category)
    }

    pub fn window(&self) -> &QuietWindow {
        &self.window
    }
}
