use chrono::FixedOffset;

use crate::types::{AnalyzedCandidate, Outcome, Verdict};

/// Render the chat message for a run outcome (Telegram HTML).
pub fn render(outcome: &Outcome, display_offset: FixedOffset, tz_label: &str) -> String {
    match outcome {
        Outcome::Best { candidate, verdict } => {
            render_best(candidate, *verdict, display_offset, tz_label)
        }
        Outcome::NoAnalyzable => "⚠️ <b>Sin análisis válido hoy</b>\n\
             La API respondió sin datos analizables.\n\
             El bot reintenta automáticamente."
            .to_string(),
        Outcome::NoFixtures => "📭 <b>Sin partidos programados</b>\n\
             La API no devolvió partidos para el periodo consultado.\n\
             El bot reintenta automáticamente."
            .to_string(),
        Outcome::FixturesUnavailable(reason) => format!(
            "❌ <b>No se pudieron obtener los partidos</b>\n\
             Error: {}\n\
             El bot reintenta automáticamente.",
            escape_html(reason)
        ),
    }
}

fn render_best(
    c: &AnalyzedCandidate,
    verdict: Verdict,
    display_offset: FixedOffset,
    tz_label: &str,
) -> String {
    let fx = &c.fixture;
    let kickoff = fx.kickoff_utc.with_timezone(&display_offset).format("%Y-%m-%d %H:%M");
    let league = if fx.league_country.is_empty() {
        escape_html(&fx.league_name)
    } else {
        format!("{} ({})", escape_html(&fx.league_name), escape_html(&fx.league_country))
    };

    format!(
        "⚽ <b>MEJOR PARTIDO PARA EMPATE</b>\n\n\
         🏆 {league}\n\
         👥 {} vs {}\n\
         🕒 {kickoff} ({})\n\n\
         📊 <b>Métricas</b>\n\
         • % Empates (H2H): {:.1}%\n\
         • Goles promedio: {:.2}\n\
         • Dif. goles: {:.2}\n\
         • Score: {:.3}\n\
         • Datos: {}\n\n\
         🧠 <b>Evaluación:</b> {}",
        escape_html(&fx.home_team_name),
        escape_html(&fx.away_team_name),
        escape_html(tz_label),
        c.draw_rate * 100.0,
        c.avg_total_goals,
        c.avg_goal_diff,
        c.score,
        c.data_quality.label(),
        verdict.label(),
    )
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
