use crate::models::{MonthlyTeamView, SummaryView};
use crate::registry::CategoryRegistry;

pub fn render_index(
    registry: &CategoryRegistry,
    monthly: &MonthlyTeamView,
    summary: &SummaryView,
) -> String {
    INDEX_HTML
        .replace("{{MONTH_START}}", &monthly.month_start)
        .replace("{{THROUGH}}", &monthly.through)
        .replace("{{TEAM_SCORE}}", &format!("{:.1}", monthly.score.total_score))
        .replace("{{TEAM_PERCENT}}", &format!("{:.1}", monthly.score.overall_percent))
        .replace("{{TEAM_ROWS}}", &team_rows(registry, monthly))
        .replace("{{SUMMARY_HEAD}}", &summary_head(registry))
        .replace("{{SUMMARY_ROWS}}", &summary_rows(registry, summary))
        .replace("{{STAFF_OPTIONS}}", &staff_options(registry))
        .replace("{{SALES_FIELDS}}", &sales_fields(registry))
}

fn team_rows(registry: &CategoryRegistry, monthly: &MonthlyTeamView) -> String {
    registry
        .performance
        .iter()
        .filter_map(|category| {
            let score = monthly.score.category(&category.key)?;
            Some(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.2} / {}</td></tr>",
                escape(&category.display_name),
                format_number(score.current),
                format_number(score.target),
                format_variance(score.variance),
                score.achievement_percent,
                score.points,
                format_number(category.weight),
            ))
        })
        .collect()
}

fn summary_head(registry: &CategoryRegistry) -> String {
    let columns: String = registry
        .performance
        .iter()
        .map(|category| {
            format!(
                "<th>{}<span>wt {}</span></th>",
                escape(&category.display_name),
                format_number(category.weight)
            )
        })
        .collect();
    format!("<th>Staff</th>{columns}<th>Score</th><th>Overall</th>")
}

fn summary_rows(registry: &CategoryRegistry, summary: &SummaryView) -> String {
    summary
        .rows
        .iter()
        .map(|row| {
            let cells: String = registry
                .performance
                .iter()
                .map(|category| {
                    format!(
                        "<td>{} / {}</td>",
                        format_number(row.accumulated.value(&category.key)),
                        format_number(row.targets.value(&category.key))
                    )
                })
                .collect();
            format!(
                "<tr><td>{}</td>{cells}<td>{:.1}</td><td>{:.1}%</td></tr>",
                escape(&row.staff.display_name),
                row.total_score,
                row.overall_percent
            )
        })
        .collect()
}

fn staff_options(registry: &CategoryRegistry) -> String {
    registry
        .staff
        .iter()
        .map(|member| {
            format!(
                "<option value=\"{}\">{}</option>",
                escape(&member.id),
                escape(&member.display_name)
            )
        })
        .collect()
}

/// Input fields in form order: each performance category followed by the
/// daily-tracking categories that break it down, then any unattached ones.
fn sales_fields(registry: &CategoryRegistry) -> String {
    let grouped = registry.performance.iter().flat_map(|category| {
        let followers = registry
            .daily
            .iter()
            .filter(move |daily| daily.follows.as_deref() == Some(category.key.as_str()))
            .map(|daily| (&daily.key, &daily.display_name));
        std::iter::once((&category.key, &category.display_name)).chain(followers)
    });
    let unattached = registry
        .daily
        .iter()
        .filter(|daily| {
            daily
                .follows
                .as_deref()
                .is_none_or(|parent| registry.performance_category(parent).is_none())
        })
        .map(|daily| (&daily.key, &daily.display_name));

    grouped
        .chain(unattached)
        .map(|(key, name)| {
            format!(
                "<label>{}<input type=\"number\" min=\"0\" step=\"any\" name=\"{}\" /></label>",
                escape(name),
                escape(key)
            )
        })
        .collect()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_variance(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_number(value))
    } else {
        format_number(value)
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Sales Insights</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #24302f;
      --accent: #1f7a6d;
      --muted: #6b706d;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(1040px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 18px;
      box-shadow: 0 12px 32px rgba(36, 48, 47, 0.12);
      padding: 24px;
    }

    h1, h2 {
      margin: 0 0 8px;
    }

    .subtitle, th span {
      color: var(--muted);
      font-size: 0.85rem;
    }

    th span {
      display: block;
      font-weight: 400;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      padding: 8px;
      border-bottom: 1px solid #e4e1d9;
      text-align: center;
    }

    th:first-child, td:first-child {
      text-align: left;
    }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
    }

    input, select, button {
      padding: 8px;
      border-radius: 8px;
      border: 1px solid #cfcac0;
      font: inherit;
    }

    button {
      background: var(--accent);
      color: #fff;
      border: none;
      cursor: pointer;
    }

    #status {
      min-height: 1.2em;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Sales Insights</h1>
      <p class="subtitle">Team performance for {{MONTH_START}} to {{THROUGH}}: {{TEAM_SCORE}} points ({{TEAM_PERCENT}}%)</p>
    </header>

    <section>
      <h2>Current Month Team Performance</h2>
      <table>
        <thead><tr><th>Category</th><th>Actual</th><th>Target</th><th>Variance</th><th>Achievement</th><th>Points</th></tr></thead>
        <tbody>{{TEAM_ROWS}}</tbody>
      </table>
    </section>

    <section>
      <h2>Staff Performance Summary</h2>
      <table>
        <thead><tr>{{SUMMARY_HEAD}}</tr></thead>
        <tbody>{{SUMMARY_ROWS}}</tbody>
      </table>
    </section>

    <section>
      <h2>Daily Sales</h2>
      <form id="sales-form">
        <label>Staff<select name="staff_id">{{STAFF_OPTIONS}}</select></label>
        <label>Date<input type="date" name="date" /></label>
        {{SALES_FIELDS}}
        <button type="submit">Save</button>
      </form>
      <p id="status"></p>
    </section>
  </main>

  <script>
    const form = document.getElementById('sales-form');
    const status = document.getElementById('status');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const data = new FormData(form);
      const values = {};
      for (const [key, raw] of data.entries()) {
        if (key === 'staff_id' || key === 'date' || raw === '') continue;
        values[key] = Number(raw);
      }
      const body = { staff_id: data.get('staff_id'), values };
      if (data.get('date')) body.date = data.get('date');

      const res = await fetch('/api/sales', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      if (!res.ok) {
        status.textContent = await res.text();
        return;
      }
      window.location.reload();
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRecordSet, TargetSet};
    use crate::views::{summary_view, team_monthly_view};
    use chrono::NaiveDate;

    #[test]
    fn index_fills_every_placeholder() {
        let registry = CategoryRegistry::standard();
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let records = DailyRecordSet::default();
        let targets = TargetSet::default();
        let html = render_index(
            &registry,
            &team_monthly_view(&records, &targets, &registry, today),
            &summary_view(&records, &targets, &registry),
        );
        assert!(!html.contains("{{"));
        assert!(html.contains("2024-03-01 to 2024-03-09"));
        assert!(html.contains("Vanezza"));
        assert!(html.contains("name=\"celcomPostpaid\""));
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(85.5), "85.50");
        assert_eq!(format_variance(30.0), "+30");
        assert_eq!(format_variance(-12.5), "-12.50");
        assert_eq!(escape("<b>&"), "&lt;b&gt;&amp;");
    }

    #[test]
    fn daily_fields_sit_under_the_category_they_follow() {
        let registry = CategoryRegistry::standard();
        let fields = sales_fields(&registry);
        let at = |key: &str| fields.find(&format!("name=\"{key}\"")).unwrap();
        assert!(at("postpaid") < at("celcomPostpaid"));
        assert!(at("digiPostpaid") < at("hvc"));
        assert!(at("hvc") < at("suppline"));
        assert!(at("device") < at("fibre"));
        assert_eq!(
            fields.matches("<label>").count(),
            registry.performance.len() + registry.daily.len()
        );
    }

    #[test]
    fn team_table_shows_signed_variance() {
        let registry = CategoryRegistry::standard();
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let html = team_rows(
            &registry,
            &team_monthly_view(
                &DailyRecordSet::default(),
                &TargetSet::default(),
                &registry,
                today,
            ),
        );
        assert!(html.contains("<td>Postpaid</td><td>0</td><td>500</td><td>-500</td>"));
    }
}
