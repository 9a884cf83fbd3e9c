//! HTML rendering for the live-metrics dashboard.

use crate::scoring::{Interaction, WeightState};

/// Render the dashboard page: interaction count, raw weights, EMA baselines
/// and the recent exchange list.
pub fn render(total: u64, row: &WeightState, recent: &[Interaction]) -> String {
    let mut rows = String::new();
    for entry in recent.iter().rev() {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td></tr>\n",
            escape(&entry.prompt),
            entry.scores.coherence,
            entry.scores.grounding,
            entry.scores.illumination,
        ));
    }

    format!(
        r#"<html>
<head>
    <title>Mythos Arbiter Dashboard</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 40px; background: #f9fafb; color: #222; }}
        h1 {{ color: #0077aa; }}
        .grid {{ display: flex; gap: 2em; margin-bottom: 2em; }}
        .card {{ background: white; padding: 1.5em; border-radius: 10px; box-shadow: 0 3px 8px rgba(0,0,0,0.1); }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ border: 1px solid #ccc; padding: 8px; text-align: left; }}
        th {{ background-color: #0077aa; color: white; }}
    </style>
</head>
<body>
    <h1>Mythos Arbiter — Live Metrics</h1>
    <div class="grid">
        <div class="card">
            <h3>Total Interactions</h3>
            <p><b>{total}</b></p>
        </div>
        <div class="card">
            <h3>Weights</h3>
            <p>Coherence: {w_c}<br>
               Grounding: {w_g}<br>
               Illumination: {w_i}</p>
        </div>
        <div class="card">
            <h3>EMA</h3>
            <p>Coherence: {e_c}<br>
               Grounding: {e_g}<br>
               Illumination: {e_i}</p>
        </div>
    </div>
    <table>
        <tr><th>Prompt</th><th>Coherence</th><th>Grounding</th><th>Illumination</th></tr>
        {rows}
    </table>
</body>
</html>
"#,
        total = total,
        w_c = row.w_coherence,
        w_g = row.w_grounding,
        w_i = row.w_illumination,
        e_c = row.ema_coherence,
        e_g = row.ema_grounding,
        e_i = row.ema_illumination,
        rows = rows,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreTriple;

    #[test]
    fn test_render_includes_state() {
        let mut row = WeightState::default();
        row.w_coherence = 1.25;
        let html = render(7, &row, &[]);
        assert!(html.contains("<b>7</b>"));
        assert!(html.contains("Coherence: 1.25"));
    }

    #[test]
    fn test_prompts_are_escaped() {
        let entry = Interaction {
            id: uuid::Uuid::new_v4(),
            prompt: "<script>alert(1)</script>".into(),
            response: "ok".into(),
            scores: ScoreTriple {
                coherence: 0.4,
                grounding: 0.3,
                illumination: 0.3,
            },
            created_at: 0.0,
        };
        let html = render(1, &WeightState::default(), &[entry]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
