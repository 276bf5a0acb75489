/// A clamped `[start, start + count)` window over records ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRange {
    start: u64,
    count: u64,
}

impl ListRange {
    /// Page size used when the requested count is out of range.
    pub const DEFAULT_COUNT: u64 = 10;
    pub const MAX_COUNT: u64 = 10;

    /// Builds a range from raw caller values.
    ///
    /// `count` outside `[1, MAX_COUNT]` collapses to `DEFAULT_COUNT` and a
    /// negative `start` collapses to 0.
    pub fn new(start: i64, count: i64) -> Self {
        let count = match u64::try_from(count) {
            Ok(count) if (1..=Self::MAX_COUNT).contains(&count) => count,
            _ => Self::DEFAULT_COUNT,
        };
        let start = u64::try_from(start).unwrap_or(0);

        Self { start, count }
    }

    /// Builds a range from optional textual parameters.
    ///
    /// Missing or unparsable values are treated as 0, which then clamps
    /// like any other out-of-range value.
    pub fn parse(start: Option<&str>, count: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };

        Self::new(parse(start), parse(count))
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Default for ListRange {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
