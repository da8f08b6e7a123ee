use crate::error::BookingError;
use core::fmt;
use std::str::FromStr;

/// Width of one grid slot in minutes.
pub const SLOT_MINUTES: u16 = 30;

const DAY_END: u16 = 24 * 60;

/// A time of day quantized to the half-hour grid, stored as minutes from
/// midnight.
///
/// `24:00` is representable so it can serve as the exclusive end bound of an
/// interval (a room closing at midnight, or a booking whose last selected
/// slot is `23:30`). It is never a valid slot *start*.
///
/// # Examples
/// ```
/// use bandroom::time::SlotTime;
///
/// let t: SlotTime = "13:30".parse().unwrap();
/// assert_eq!(t.to_string(), "13:30");
/// assert_eq!(t.minutes(), 13 * 60 + 30);
///
/// assert!("23:45".parse::<SlotTime>().is_err());
/// assert!("25:00".parse::<SlotTime>().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct SlotTime(u16);

impl SlotTime {
    /// Constructs a time from hours and minutes.
    ///
    /// Rejects anything off the 30-minute grid or past `24:00`.
    ///
    /// # Examples
    /// ```
    /// use bandroom::time::SlotTime;
    ///
    /// assert!(SlotTime::from_hm(9, 0).is_ok());
    /// assert!(SlotTime::from_hm(24, 0).is_ok());
    /// assert!(SlotTime::from_hm(9, 15).is_err());
    /// assert!(SlotTime::from_hm(24, 30).is_err());
    /// ```
    pub fn from_hm(hour: u16, minute: u16) -> Result<SlotTime, BookingError> {
        if hour > 24 || minute >= 60 || minute % SLOT_MINUTES != 0 {
            return Err(BookingError::BadTime {
                input: format!("{:02}:{:02}", hour, minute),
            });
        }
        let total = hour * 60 + minute;
        if total > DAY_END {
            return Err(BookingError::BadTime {
                input: format!("{:02}:{:02}", hour, minute),
            });
        }
        Ok(SlotTime(total))
    }

    /// Minutes from midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// The next grid boundary, 30 minutes later.
    ///
    /// `23:30` advances to the `24:00` end bound; advancing past `24:00` is
    /// an error.
    ///
    /// # Examples
    /// ```
    /// use bandroom::time::SlotTime;
    ///
    /// let t: SlotTime = "23:30".parse().unwrap();
    /// assert_eq!(t.next().unwrap().to_string(), "24:00");
    /// assert!(t.next().unwrap().next().is_err());
    /// ```
    pub fn next(self) -> Result<SlotTime, BookingError> {
        if self.0 + SLOT_MINUTES > DAY_END {
            return Err(BookingError::BadTime {
                input: format!("{:02}:{:02}", (self.0 + SLOT_MINUTES) / 60, (self.0 + SLOT_MINUTES) % 60),
            });
        }
        Ok(SlotTime(self.0 + SLOT_MINUTES))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for SlotTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BookingError::BadTime {
            input: s.to_string(),
        };
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        let hour: u16 = h.parse().map_err(|_| bad())?;
        let minute: u16 = m.parse().map_err(|_| bad())?;
        SlotTime::from_hm(hour, minute).map_err(|_| bad())
    }
}

impl TryFrom<String> for SlotTime {
    type Error = BookingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SlotTime> for String {
    fn from(t: SlotTime) -> String {
        t.to_string()
    }
}

/// Half-open `[start, end)` time interval within one day.
///
/// Construction guarantees `start < end`, so downstream overlap checks never
/// need to revalidate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    start: SlotTime,
    end: SlotTime,
}

impl Interval {
    /// # Examples
    /// ```
    /// use bandroom::time::Interval;
    ///
    /// let ok = Interval::new("18:00".parse().unwrap(), "19:00".parse().unwrap());
    /// assert!(ok.is_ok());
    ///
    /// let rejected = Interval::new("19:00".parse().unwrap(), "19:00".parse().unwrap());
    /// assert!(rejected.is_err());
    /// ```
    pub fn new(start: SlotTime, end: SlotTime) -> Result<Interval, BookingError> {
        if start >= end {
            return Err(BookingError::InvalidInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    pub fn start(self) -> SlotTime {
        self.start
    }

    pub fn end(self) -> SlotTime {
        self.end
    }

    /// Half-open overlap: `self.start < other.end && self.end > other.start`.
    ///
    /// Back-to-back intervals (`18:00-19:00` and `19:00-20:00`) do not
    /// overlap.
    ///
    /// # Examples
    /// ```
    /// use bandroom::time::Interval;
    ///
    /// let a = Interval::new("18:00".parse().unwrap(), "19:00".parse().unwrap()).unwrap();
    /// let b = Interval::new("18:30".parse().unwrap(), "19:30".parse().unwrap()).unwrap();
    /// let c = Interval::new("19:00".parse().unwrap(), "20:00".parse().unwrap()).unwrap();
    ///
    /// assert!(a.overlaps(b));
    /// assert!(b.overlaps(a));
    /// assert!(!a.overlaps(c));
    /// ```
    pub fn overlaps(self, other: Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Per-room open/close bounds. Slots outside the window are never offered
/// and never accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatingWindow {
    open: SlotTime,
    close: SlotTime,
}

impl OperatingWindow {
    pub fn new(open: SlotTime, close: SlotTime) -> Result<OperatingWindow, BookingError> {
        if open >= close {
            return Err(BookingError::EmptyWindow { open, close });
        }
        Ok(OperatingWindow { open, close })
    }

    pub fn open(self) -> SlotTime {
        self.open
    }

    pub fn close(self) -> SlotTime {
        self.close
    }

    /// Whether `time` is a bookable slot start: `open <= time < close`.
    pub fn contains(self, time: SlotTime) -> bool {
        self.open <= time && time < self.close
    }

    /// Every 30-minute boundary `t` with `open <= t < close`, in order.
    ///
    /// # Examples
    /// ```
    /// use bandroom::time::OperatingWindow;
    ///
    /// let window = OperatingWindow::new(
    ///     "10:00".parse().unwrap(),
    ///     "12:00".parse().unwrap(),
    /// )
    /// .unwrap();
    ///
    /// let slots: Vec<String> = window.slots().map(|t| t.to_string()).collect();
    /// assert_eq!(slots, vec!["10:00", "10:30", "11:00", "11:30"]);
    /// ```
    pub fn slots(self) -> impl Iterator<Item = SlotTime> {
        (self.open.0..self.close.0)
            .step_by(SLOT_MINUTES as usize)
            .map(SlotTime)
    }
}
