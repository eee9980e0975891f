//! Calendar recurrence rules: encoding, parsing, and next-occurrence search.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Weekday};
use thiserror::Error;

/// Upper bound on the day-by-day occurrence search. A rule that matches
/// nothing within ten years is treated as unable to fire (for example
/// monthly day 31 with an interval that only ever lands on 30-day months).
const MAX_LOOKAHEAD_DAYS: u32 = 3653;

#[derive(Debug, Error)]
pub enum RecurrenceError {
    /// Malformed stored encoding. Callers treat the rule as "no
    /// recurrence" and keep going.
    #[error("invalid recurrence encoding: {0}")]
    Parse(String),

    /// The rule cannot produce an occurrence within the search bound.
    #[error("recurrence rule cannot produce a future occurrence")]
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

// ---------------------------------------------------------------------------
// RecurrenceRule
// ---------------------------------------------------------------------------

/// A validated recurrence pattern. "No recurrence" is the absence of a
/// rule (`Option<RecurrenceRule>`); the empty encoding parses to `None`.
///
/// Fields are private so every constructed rule satisfies its structural
/// invariants (a weekly rule always has at least one weekday, month-day
/// and month are always in range, interval is at least 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    /// Weekly only. Sorted Monday-first, deduplicated, never empty.
    weekdays: Vec<Weekday>,
    /// Monthly and yearly.
    month_day: Option<u32>,
    /// Yearly.
    month: Option<u32>,
    start: NaiveDate,
    /// Occurrences on or after this date do not count.
    until: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn daily(interval: u32, start: NaiveDate) -> Result<Self, RecurrenceError> {
        Self::build(Frequency::Daily, interval, vec![], None, None, start, None)
    }

    pub fn weekly(
        interval: u32,
        weekdays: Vec<Weekday>,
        start: NaiveDate,
    ) -> Result<Self, RecurrenceError> {
        Self::build(Frequency::Weekly, interval, weekdays, None, None, start, None)
    }

    pub fn monthly(interval: u32, month_day: u32, start: NaiveDate) -> Result<Self, RecurrenceError> {
        Self::build(
            Frequency::Monthly,
            interval,
            vec![],
            Some(month_day),
            None,
            start,
            None,
        )
    }

    pub fn yearly(
        interval: u32,
        month: u32,
        month_day: u32,
        start: NaiveDate,
    ) -> Result<Self, RecurrenceError> {
        Self::build(
            Frequency::Yearly,
            interval,
            vec![],
            Some(month_day),
            Some(month),
            start,
            None,
        )
    }

    pub fn with_until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    fn build(
        frequency: Frequency,
        interval: u32,
        mut weekdays: Vec<Weekday>,
        month_day: Option<u32>,
        month: Option<u32>,
        start: NaiveDate,
        until: Option<NaiveDate>,
    ) -> Result<Self, RecurrenceError> {
        if interval == 0 {
            return Err(RecurrenceError::Parse("INTERVAL must be at least 1".into()));
        }
        weekdays.sort_by_key(|w| w.num_days_from_monday());
        weekdays.dedup();
        match frequency {
            Frequency::Daily => {
                if !weekdays.is_empty() || month_day.is_some() || month.is_some() {
                    return Err(RecurrenceError::Parse(
                        "BYDAY/BYMONTHDAY/BYMONTH are not valid for FREQ=DAILY".into(),
                    ));
                }
            }
            Frequency::Weekly => {
                if weekdays.is_empty() {
                    return Err(RecurrenceError::Parse(
                        "weekly rule requires at least one weekday".into(),
                    ));
                }
                if month_day.is_some() || month.is_some() {
                    return Err(RecurrenceError::Parse(
                        "BYMONTHDAY/BYMONTH are not valid for FREQ=WEEKLY".into(),
                    ));
                }
            }
            Frequency::Monthly => {
                if !weekdays.is_empty() || month.is_some() {
                    return Err(RecurrenceError::Parse(
                        "BYDAY/BYMONTH are not valid for FREQ=MONTHLY".into(),
                    ));
                }
                match month_day {
                    Some(1..=31) => {}
                    _ => {
                        return Err(RecurrenceError::Parse(
                            "monthly rule requires BYMONTHDAY in 1..=31".into(),
                        ))
                    }
                }
            }
            Frequency::Yearly => {
                if !weekdays.is_empty() {
                    return Err(RecurrenceError::Parse(
                        "BYDAY is not valid for FREQ=YEARLY".into(),
                    ));
                }
                match (month, month_day) {
                    (Some(1..=12), Some(1..=31)) => {}
                    _ => {
                        return Err(RecurrenceError::Parse(
                            "yearly rule requires BYMONTH in 1..=12 and BYMONTHDAY in 1..=31".into(),
                        ))
                    }
                }
            }
        }
        Ok(Self {
            frequency,
            interval,
            weekdays,
            month_day,
            month,
            start,
            until,
        })
    }

    // -- occurrence search --------------------------------------------------

    /// Next date on which the rule is due, at or after `after` (strictly
    /// after when `inclusive` is false). Dates before `start` never
    /// count; `Ok(None)` means `until` cut the rule off.
    pub fn next_occurrence(
        &self,
        after: NaiveDate,
        inclusive: bool,
    ) -> Result<Option<NaiveDate>, RecurrenceError> {
        let mut candidate = if inclusive {
            after
        } else {
            after.succ_opt().ok_or(RecurrenceError::Exhausted)?
        };
        if candidate < self.start {
            candidate = self.start;
        }
        for _ in 0..MAX_LOOKAHEAD_DAYS {
            if let Some(until) = self.until {
                if candidate >= until {
                    return Ok(None);
                }
            }
            if self.matches(candidate) {
                return Ok(Some(candidate));
            }
            candidate = candidate.succ_opt().ok_or(RecurrenceError::Exhausted)?;
        }
        Err(RecurrenceError::Exhausted)
    }

    /// Next concrete firing instant: the next occurrence date combined
    /// with the reminder clock time. When the matched date's clock time
    /// has already passed (the "today matched but 09:00 is gone" case),
    /// the search moves strictly past that date.
    pub fn next_firing<Tz: TimeZone>(
        &self,
        clock: NaiveTime,
        now: &DateTime<Tz>,
    ) -> Result<Option<DateTime<Tz>>, RecurrenceError> {
        let mut after = now.date_naive();
        let mut inclusive = true;
        // A couple of extra iterations cover dates whose local clock
        // time does not exist (DST gaps).
        for _ in 0..4 {
            let date = match self.next_occurrence(after, inclusive)? {
                Some(d) => d,
                None => return Ok(None),
            };
            if let Some(at) = now.timezone().from_local_datetime(&date.and_time(clock)).earliest() {
                if at > *now {
                    return Ok(Some(at));
                }
            }
            after = date;
            inclusive = false;
        }
        Ok(None)
    }

    fn matches(&self, date: NaiveDate) -> bool {
        if date < self.start {
            return false;
        }
        match self.frequency {
            Frequency::Daily => {
                let days = (date - self.start).num_days();
                days % i64::from(self.interval) == 0
            }
            Frequency::Weekly => {
                if !self.weekdays.contains(&date.weekday()) {
                    return false;
                }
                let weeks = (week_start(date) - week_start(self.start)).num_days() / 7;
                weeks % i64::from(self.interval) == 0
            }
            Frequency::Monthly => {
                if Some(date.day()) != self.month_day {
                    return false;
                }
                let months = month_index(date) - month_index(self.start);
                months % i64::from(self.interval) == 0
            }
            Frequency::Yearly => {
                if Some(date.month()) != self.month || Some(date.day()) != self.month_day {
                    return false;
                }
                let years = i64::from(date.year()) - i64::from(self.start.year());
                years % i64::from(self.interval) == 0
            }
        }
    }

    // -- canonical encoding -------------------------------------------------

    /// Canonical textual form; `parse(encode(rule))` yields an equal rule.
    pub fn encode(&self) -> String {
        let mut out = format!("FREQ={};INTERVAL={}", self.frequency.as_str(), self.interval);
        if !self.weekdays.is_empty() {
            let days: Vec<&str> = self.weekdays.iter().map(|w| weekday_code(*w)).collect();
            out.push_str(&format!(";BYDAY={}", days.join(",")));
        }
        if let Some(d) = self.month_day {
            out.push_str(&format!(";BYMONTHDAY={d}"));
        }
        if let Some(m) = self.month {
            out.push_str(&format!(";BYMONTH={m}"));
        }
        out.push_str(&format!(";DTSTART={}", self.start.format("%Y-%m-%d")));
        if let Some(u) = self.until {
            out.push_str(&format!(";UNTIL={}", u.format("%Y-%m-%d")));
        }
        out
    }

    /// Parse the canonical encoding. The empty (or blank) string denotes
    /// "no recurrence" and parses to `None`.
    pub fn parse(input: &str) -> Result<Option<Self>, RecurrenceError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let mut frequency = None;
        let mut interval = 1u32;
        let mut weekdays = Vec::new();
        let mut month_day = None;
        let mut month = None;
        let mut start = None;
        let mut until = None;
        let mut seen: Vec<&str> = Vec::new();

        for part in input.split(';') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RecurrenceError::Parse(format!("expected KEY=VALUE, got {part:?}")))?;
            if seen.contains(&key) {
                return Err(RecurrenceError::Parse(format!("duplicate key {key}")));
            }
            match key {
                "FREQ" => {
                    frequency = Some(match value {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        "YEARLY" => Frequency::Yearly,
                        other => {
                            return Err(RecurrenceError::Parse(format!("unknown FREQ {other:?}")))
                        }
                    });
                }
                "INTERVAL" => {
                    interval = value
                        .parse()
                        .map_err(|_| RecurrenceError::Parse(format!("bad INTERVAL {value:?}")))?;
                }
                "BYDAY" => {
                    for code in value.split(',') {
                        weekdays.push(parse_weekday(code)?);
                    }
                }
                "BYMONTHDAY" => {
                    month_day = Some(value.parse().map_err(|_| {
                        RecurrenceError::Parse(format!("bad BYMONTHDAY {value:?}"))
                    })?);
                }
                "BYMONTH" => {
                    month = Some(
                        value
                            .parse()
                            .map_err(|_| RecurrenceError::Parse(format!("bad BYMONTH {value:?}")))?,
                    );
                }
                "DTSTART" => start = Some(parse_date(value)?),
                "UNTIL" => until = Some(parse_date(value)?),
                other => return Err(RecurrenceError::Parse(format!("unknown key {other}"))),
            }
            seen.push(key);
        }

        let frequency =
            frequency.ok_or_else(|| RecurrenceError::Parse("missing FREQ".into()))?;
        let start = start.ok_or_else(|| RecurrenceError::Parse("missing DTSTART".into()))?;
        let mut rule = Self::build(frequency, interval, weekdays, month_day, month, start, None)?;
        rule.until = until;
        Ok(Some(rule))
    }

    /// Short human summary for task listings, e.g.
    /// "every 2 weeks on Mon, Fri until 2024-12-31".
    pub fn describe(&self) -> String {
        let unit = match self.frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        };
        let mut out = if self.interval == 1 {
            format!("every {unit}")
        } else {
            format!("every {} {unit}s", self.interval)
        };
        match self.frequency {
            Frequency::Weekly => {
                let days: Vec<String> = self
                    .weekdays
                    .iter()
                    .map(|w| {
                        let name = format!("{w:?}");
                        name[..3.min(name.len())].to_string()
                    })
                    .collect();
                out.push_str(&format!(" on {}", days.join(", ")));
            }
            Frequency::Monthly => {
                out.push_str(&format!(" on day {}", self.month_day.unwrap_or(1)));
            }
            Frequency::Yearly => {
                out.push_str(&format!(
                    " on {:02}-{:02}",
                    self.month.unwrap_or(1),
                    self.month_day.unwrap_or(1)
                ));
            }
            Frequency::Daily => {}
        }
        if let Some(u) = self.until {
            out.push_str(&format!(" until {}", u.format("%Y-%m-%d")));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn weekday_code(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn parse_weekday(code: &str) -> Result<Weekday, RecurrenceError> {
    Ok(match code {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        other => return Err(RecurrenceError::Parse(format!("unknown weekday {other:?}"))),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, RecurrenceError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RecurrenceError::Parse(format!("bad date {value:?}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(&date(y, m, d).and_hms_opt(h, min, 0).unwrap())
            .unwrap()
    }

    // -- construction -------------------------------------------------------

    #[test]
    fn weekly_with_empty_weekday_set_is_rejected() {
        let err = RecurrenceRule::weekly(1, vec![], date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, RecurrenceError::Parse(_)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(RecurrenceRule::daily(0, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn out_of_range_month_day_is_rejected() {
        assert!(RecurrenceRule::monthly(1, 0, date(2024, 1, 1)).is_err());
        assert!(RecurrenceRule::monthly(1, 32, date(2024, 1, 1)).is_err());
        assert!(RecurrenceRule::yearly(1, 13, 1, date(2024, 1, 1)).is_err());
    }

    // -- next_occurrence ----------------------------------------------------

    #[test]
    fn daily_interval_two_skips_alternate_days() {
        let rule = RecurrenceRule::daily(2, date(2024, 1, 1)).unwrap();
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 2), true).unwrap(),
            Some(date(2024, 1, 3))
        );
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 3), true).unwrap(),
            Some(date(2024, 1, 3))
        );
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 3), false).unwrap(),
            Some(date(2024, 1, 5))
        );
    }

    #[test]
    fn occurrences_never_precede_start() {
        let rule = RecurrenceRule::daily(1, date(2024, 6, 1)).unwrap();
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 1), true).unwrap(),
            Some(date(2024, 6, 1))
        );
    }

    #[test]
    fn weekly_picks_next_listed_weekday() {
        // 2024-01-01 is a Monday.
        let rule = RecurrenceRule::weekly(
            1,
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            date(2024, 1, 1),
        )
        .unwrap();
        // Wednesday, inclusive: Wednesday itself.
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 3), true).unwrap(),
            Some(date(2024, 1, 3))
        );
        // Wednesday, exclusive: Friday.
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 3), false).unwrap(),
            Some(date(2024, 1, 5))
        );
    }

    #[test]
    fn weekly_interval_two_is_anchored_at_start_week() {
        let rule =
            RecurrenceRule::weekly(2, vec![Weekday::Mon], date(2024, 1, 1)).unwrap();
        // Week of Jan 1 matches, week of Jan 8 does not, week of Jan 15 does.
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 2), true).unwrap(),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let rule = RecurrenceRule::monthly(1, 31, date(2024, 1, 1)).unwrap();
        // April has 30 days: skip to May 31.
        assert_eq!(
            rule.next_occurrence(date(2024, 4, 1), true).unwrap(),
            Some(date(2024, 5, 31))
        );
        // February 2024: skip to March 31.
        assert_eq!(
            rule.next_occurrence(date(2024, 2, 1), true).unwrap(),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn yearly_feb_29_lands_on_leap_years_only() {
        let rule = RecurrenceRule::yearly(1, 2, 29, date(2024, 1, 1)).unwrap();
        assert_eq!(
            rule.next_occurrence(date(2024, 3, 1), true).unwrap(),
            Some(date(2028, 2, 29))
        );
    }

    #[test]
    fn until_cuts_off_the_rule() {
        let rule = RecurrenceRule::daily(1, date(2024, 1, 1))
            .unwrap()
            .with_until(date(2024, 1, 5));
        assert_eq!(
            rule.next_occurrence(date(2024, 1, 4), true).unwrap(),
            Some(date(2024, 1, 4))
        );
        // Occurrences at or after the until date do not count.
        assert_eq!(rule.next_occurrence(date(2024, 1, 5), true).unwrap(), None);
    }

    #[test]
    fn impossible_rule_reports_exhausted() {
        // February never has 30 days.
        let rule = RecurrenceRule::yearly(1, 2, 30, date(2024, 1, 1)).unwrap();
        assert!(matches!(
            rule.next_occurrence(date(2024, 1, 1), true),
            Err(RecurrenceError::Exhausted)
        ));
    }

    // -- next_firing --------------------------------------------------------

    #[test]
    fn firing_skips_to_friday_when_wednesday_time_has_passed() {
        // Weekly MO/WE/FR at 09:00, queried Wednesday 2024-01-03 10:00:
        // the next firing is Friday 09:00.
        let rule = RecurrenceRule::weekly(
            1,
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            date(2024, 1, 1),
        )
        .unwrap();
        let clock = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let now = local(2024, 1, 3, 10, 0);
        let at = rule.next_firing(clock, &now).unwrap().unwrap();
        assert_eq!(at, local(2024, 1, 5, 9, 0));
    }

    #[test]
    fn firing_uses_today_when_time_is_still_ahead() {
        let rule = RecurrenceRule::daily(1, date(2024, 1, 1)).unwrap();
        let clock = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
        let now = local(2024, 1, 3, 10, 0);
        let at = rule.next_firing(clock, &now).unwrap().unwrap();
        assert_eq!(at, local(2024, 1, 3, 21, 0));
    }

    #[test]
    fn firing_is_always_in_the_future() {
        let rule = RecurrenceRule::daily(1, date(2024, 1, 1)).unwrap();
        let clock = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let now = local(2024, 1, 3, 9, 0);
        // Exactly 09:00: today's 09:00 is not after now, so tomorrow.
        let at = rule.next_firing(clock, &now).unwrap().unwrap();
        assert_eq!(at, local(2024, 1, 4, 9, 0));
    }

    #[test]
    fn expired_rule_produces_no_firing() {
        let rule = RecurrenceRule::daily(1, date(2024, 1, 1))
            .unwrap()
            .with_until(date(2024, 1, 2));
        let clock = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(rule.next_firing(clock, &local(2024, 2, 1, 8, 0)).unwrap(), None);
    }

    // -- encoding -----------------------------------------------------------

    #[test]
    fn encode_is_canonical() {
        let rule = RecurrenceRule::weekly(
            2,
            vec![Weekday::Fri, Weekday::Mon],
            date(2024, 1, 1),
        )
        .unwrap()
        .with_until(date(2024, 12, 31));
        assert_eq!(
            rule.encode(),
            "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,FR;DTSTART=2024-01-01;UNTIL=2024-12-31"
        );
    }

    #[test]
    fn roundtrip_preserves_every_field() {
        let rules = vec![
            RecurrenceRule::daily(3, date(2024, 2, 10)).unwrap(),
            RecurrenceRule::weekly(1, vec![Weekday::Sun], date(2023, 12, 31)).unwrap(),
            RecurrenceRule::monthly(6, 31, date(2024, 1, 31))
                .unwrap()
                .with_until(date(2026, 1, 1)),
            RecurrenceRule::yearly(4, 2, 29, date(2024, 2, 29)).unwrap(),
        ];
        for rule in rules {
            let parsed = RecurrenceRule::parse(&rule.encode()).unwrap().unwrap();
            assert_eq!(parsed, rule);
        }
    }

    #[test]
    fn empty_encoding_parses_to_none() {
        assert_eq!(RecurrenceRule::parse("").unwrap(), None);
        assert_eq!(RecurrenceRule::parse("   ").unwrap(), None);
    }

    #[test]
    fn malformed_encodings_are_parse_errors() {
        for bad in [
            "FREQ=HOURLY;INTERVAL=1;DTSTART=2024-01-01",
            "FREQ=DAILY;DTSTART=01/02/2024",
            "FREQ=DAILY",
            "INTERVAL=2;DTSTART=2024-01-01",
            "FREQ=WEEKLY;INTERVAL=1;DTSTART=2024-01-01",
            "FREQ=DAILY;INTERVAL=0;DTSTART=2024-01-01",
            "FREQ=DAILY;INTERVAL=1;DTSTART=2024-01-01;WKST=MO",
            "FREQ=DAILY;FREQ=DAILY;INTERVAL=1;DTSTART=2024-01-01",
            "FREQ=WEEKLY;INTERVAL=1;BYDAY=XX;DTSTART=2024-01-01",
            "not a rule",
        ] {
            assert!(
                matches!(RecurrenceRule::parse(bad), Err(RecurrenceError::Parse(_))),
                "expected parse error for {bad:?}"
            );
        }
    }

    #[test]
    fn byday_order_is_normalized() {
        let a = RecurrenceRule::parse(
            "FREQ=WEEKLY;INTERVAL=1;BYDAY=FR,MO,WE;DTSTART=2024-01-01",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            a.encode(),
            "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE,FR;DTSTART=2024-01-01"
        );
    }

    #[test]
    fn describe_summaries() {
        let rule = RecurrenceRule::weekly(
            2,
            vec![Weekday::Mon, Weekday::Fri],
            date(2024, 1, 1),
        )
        .unwrap()
        .with_until(date(2024, 12, 31));
        assert_eq!(rule.describe(), "every 2 weeks on Mon, Fri until 2024-12-31");
        assert_eq!(
            RecurrenceRule::daily(1, date(2024, 1, 1)).unwrap().describe(),
            "every day"
        );
    }
}
