use crate::locale::AppLocale;
use crate::models::{CompletionRecord, SummaryAggregate};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;
use tracing::warn;

/// Order in which day groups are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayOrder {
    /// Whatever order the goals API returned.
    #[default]
    Provider,
    Chronological,
}

impl DayOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "provider" => Some(Self::Provider),
            "chronological" => Some(Self::Chronological),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub id: String,
    pub title: String,
    pub completed_at: DateTime<Utc>,
    pub time_label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub date: String,
    pub weekday: String,
    pub day_label: String,
    pub entries: Vec<CompletionEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_label: String,
    pub completed: u64,
    pub total_goals: u64,
    pub completed_percentage: u64,
    pub days: Vec<DayGroup>,
}

impl SummaryView {
    pub fn has_completions(&self) -> bool {
        !self.days.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum SummaryState {
    /// Nothing loaded yet; renders as empty output.
    Loading,
    Ready(SummaryView),
    Failed(String),
}

/// `round(completed / total * 100)`, or 0 when there are no goals.
pub fn completed_percentage(completed: u64, total_goals: u64) -> u64 {
    if total_goals == 0 {
        return 0;
    }
    (completed as f64 / total_goals as f64 * 100.0).round() as u64
}

pub fn build_view(summary: &SummaryAggregate, locale: AppLocale, order: DayOrder) -> SummaryView {
    build_view_at(Local::now().date_naive(), &Local, summary, locale, order)
}

pub fn build_view_at<Tz>(
    today: NaiveDate,
    tz: &Tz,
    summary: &SummaryAggregate,
    locale: AppLocale,
    order: DayOrder,
) -> SummaryView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (week_start, week_end) = week_bounds(today, locale);
    let week_label = format!(
        "{} {} {}",
        format_date(week_start, locale.range_format(), locale),
        locale.labels().range_joiner,
        format_date(week_end, locale.range_format(), locale),
    );

    let mut days: Vec<DayGroup> = summary
        .goals_per_day
        .iter()
        .flat_map(|days| days.iter())
        .map(|(date, records)| day_group(date, records, tz, locale))
        .collect();

    if order == DayOrder::Chronological {
        days.sort_by(|a, b| a.date.cmp(&b.date));
    }

    SummaryView {
        week_start,
        week_end,
        week_label,
        completed: summary.completed,
        total_goals: summary.total_goals,
        completed_percentage: completed_percentage(summary.completed, summary.total_goals),
        days,
    }
}

fn day_group<Tz>(date: &str, records: &[CompletionRecord], tz: &Tz, locale: AppLocale) -> DayGroup
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (weekday, day_label) = match parse_day_key(date) {
        Some(day) => (
            format_date(day, locale.weekday_format(), locale),
            format_date(day, locale.day_month_format(), locale),
        ),
        None => {
            warn!(date, "unrecognized day key in summary");
            (String::new(), String::new())
        }
    };

    let entries = records
        .iter()
        .map(|record| CompletionEntry {
            id: record.id.clone(),
            title: record.title.clone(),
            completed_at: record.completed_at,
            time_label: format_time(record.completed_at, tz, locale),
        })
        .collect();

    DayGroup {
        date: date.to_string(),
        weekday,
        day_label,
        entries,
    }
}

fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(key).ok().map(|at| at.date_naive()))
}

pub fn week_bounds(today: NaiveDate, locale: AppLocale) -> (NaiveDate, NaiveDate) {
    let offset = (7 + today.weekday().num_days_from_monday()
        - locale.week_start().num_days_from_monday())
        % 7;
    let start = today - Duration::days(i64::from(offset));
    (start, start + Duration::days(6))
}

fn format_date(date: NaiveDate, fmt: &str, locale: AppLocale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(fmt, locale.chrono())
        .to_string()
}

fn format_time<Tz>(at: DateTime<Utc>, tz: &Tz, locale: AppLocale) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz)
        .format_localized(locale.time_format(), locale.chrono())
        .to_string()
}
