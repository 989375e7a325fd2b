use crate::locale::{AppLocale, Labels};
use crate::models::PendingGoal;
use crate::summary::{SummaryState, SummaryView};
use std::fmt::Write;

/// Transient message shown once after a failed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    UndoFailed,
    CompleteFailed,
    CreateFailed,
}

impl Notice {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "undo-failed" => Some(Self::UndoFailed),
            "complete-failed" => Some(Self::CompleteFailed),
            "create-failed" => Some(Self::CreateFailed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UndoFailed => "undo-failed",
            Self::CompleteFailed => "complete-failed",
            Self::CreateFailed => "create-failed",
        }
    }

    fn message(self, labels: &Labels) -> &'static str {
        match self {
            Self::UndoFailed => labels.undo_failed,
            Self::CompleteFailed => labels.complete_failed,
            Self::CreateFailed => labels.create_failed,
        }
    }
}

pub fn render_index(
    summary: &SummaryState,
    pending: Option<&[PendingGoal]>,
    notice: Option<Notice>,
    locale: AppLocale,
) -> String {
    let labels = locale.labels();
    let refresh = match summary {
        SummaryState::Loading => r#"<meta http-equiv="refresh" content="2" />"#,
        _ => "",
    };
    let notice = notice
        .map(|notice| format!(r#"<p class="notice">{}</p>"#, notice.message(labels)))
        .unwrap_or_default();

    // Summary last so user text can never be read as a placeholder.
    INDEX_HTML
        .replace("{{LANG}}", labels.html_lang)
        .replace("{{TITLE}}", labels.page_title)
        .replace("{{REFRESH}}", refresh)
        .replace("{{NOTICE}}", &notice)
        .replace("{{SUMMARY}}", &render_summary(summary, pending, labels))
}

/// Empty while loading, an error line on failure, the full week otherwise.
pub fn render_summary(
    summary: &SummaryState,
    pending: Option<&[PendingGoal]>,
    labels: &Labels,
) -> String {
    match summary {
        SummaryState::Loading => String::new(),
        SummaryState::Failed(_) => format!(r#"<p class="error">{}</p>"#, labels.load_failed),
        SummaryState::Ready(view) => render_week(view, pending, labels),
    }
}

fn render_week(view: &SummaryView, pending: Option<&[PendingGoal]>, labels: &Labels) -> String {
    let mut out = String::new();
    let width = view.completed_percentage.min(100);

    let _ = write!(
        out,
        r#"<header class="top">
  <span class="range">{range}</span>
  {new_goal}
</header>
<section class="progress-area">
  <div class="progress" role="progressbar" aria-valuenow="{completed}" aria-valuemax="{total}">
    <div class="indicator" style="width: {width}%"></div>
  </div>
  <p class="muted split">
    <span>{prefix} <strong>{completed}</strong> {of} <strong>{total}</strong> {suffix}</span>
    <span>{percentage}%</span>
  </p>
</section>
<hr />
"#,
        range = escape_html(&view.week_label),
        new_goal = render_new_goal(labels),
        completed = view.completed,
        total = view.total_goals,
        prefix = labels.completed_prefix,
        of = labels.completed_of,
        suffix = labels.completed_suffix,
        percentage = view.completed_percentage,
    );

    if let Some(goals) = pending {
        out.push_str(&render_pending(goals));
    }

    let _ = write!(out, r#"<section class="week"><h2>{}</h2>"#, labels.your_week);
    if !view.has_completions() {
        let _ = write!(out, r#"<p class="muted">{}</p>"#, labels.empty_week);
    }
    for day in &view.days {
        let _ = write!(
            out,
            r#"<div class="day"><h3><span class="weekday">{}</span> <small>({})</small></h3><ul>"#,
            escape_html(&day.weekday),
            escape_html(&day.day_label),
        );
        for entry in &day.entries {
            let _ = write!(
                out,
                r#"<li>{prefix} &ldquo;<strong>{title}</strong>&rdquo; {at} <strong>{time}</strong>
  <form method="post" action="/completions/remove"><input type="hidden" name="goalId" value="{id}" /><button class="link" type="submit">{undo}</button></form>
</li>"#,
                prefix = labels.completion_prefix,
                title = escape_html(&entry.title),
                at = labels.completion_at,
                time = escape_html(&entry.time_label),
                id = escape_html(&entry.id),
                undo = labels.undo,
            );
        }
        out.push_str("</ul></div>");
    }
    out.push_str("</section>");
    out
}

fn render_pending(goals: &[PendingGoal]) -> String {
    let mut out = String::from(r#"<section class="pending">"#);
    for goal in goals {
        let _ = write!(
            out,
            r#"<form method="post" action="/completions"><input type="hidden" name="goalId" value="{id}" /><button class="chip" type="submit"{disabled}>+ {title}</button></form>"#,
            id = escape_html(&goal.id),
            title = escape_html(&goal.title),
            disabled = if goal.is_done_for_week() { " disabled" } else { "" },
        );
    }
    out.push_str("</section>");
    out
}

fn render_new_goal(labels: &Labels) -> String {
    let options: String = (1..=7)
        .map(|n| format!(r#"<option value="{n}">{n}x</option>"#))
        .collect();
    format!(
        r#"<details class="new-goal"><summary>+ {new_goal}</summary>
    <form method="post" action="/goals">
      <label>{title} <input name="title" required /></label>
      <label>{frequency} <select name="desiredWeeklyFrequency">{options}</select></label>
      <button type="submit">{save}</button>
    </form>
  </details>"#,
        new_goal = labels.new_goal,
        title = labels.goal_title,
        frequency = labels.weekly_frequency,
        save = labels.save_goal,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  {{REFRESH}}
  <title>{{TITLE}}</title>
  <style>
    body {
      margin: 0;
      background: #09090b;
      color: #f4f4f5;
      font-family: Inter, system-ui, sans-serif;
    }

    main {
      max-width: 480px;
      margin: 0 auto;
      padding: 40px 20px;
      display: grid;
      gap: 24px;
    }

    .top, .split {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .range, .weekday {
      font-weight: 600;
      text-transform: capitalize;
    }

    .progress {
      height: 8px;
      border-radius: 999px;
      background: #18181b;
      overflow: hidden;
    }

    .indicator {
      height: 100%;
      background: linear-gradient(90deg, #db2777, #8b5cf6);
    }

    .muted, small {
      color: #a1a1aa;
      font-size: 0.8rem;
    }

    hr {
      border: none;
      border-top: 1px solid #27272a;
      width: 100%;
    }

    .pending {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .chip {
      border: 1px dashed #52525b;
      border-radius: 999px;
      background: transparent;
      color: #d4d4d8;
      padding: 6px 12px;
    }

    .chip:disabled {
      opacity: 0.5;
    }

    ul {
      list-style: none;
      padding: 0;
      display: grid;
      gap: 12px;
      color: #a1a1aa;
      font-size: 0.9rem;
    }

    strong {
      color: #f4f4f5;
      font-weight: 400;
    }

    li form {
      display: inline;
    }

    .link {
      background: none;
      border: none;
      color: #a1a1aa;
      text-decoration: underline;
      font-size: 0.75rem;
      cursor: pointer;
    }

    .notice, .error {
      border-radius: 8px;
      padding: 10px 14px;
      background: #450a0a;
      color: #fecaca;
    }
  </style>
</head>
<body>
  <main>
    {{NOTICE}}
    {{SUMMARY}}
  </main>
</body>
</html>
"#;
