use crate::output::Output;
use color_eyre::Result;
use moviedex_core::Session;
use serde_json::json;

pub fn run_recent(clear: bool, session: &mut Session, output: &Output) -> Result<()> {
    if clear {
        session.history_mut().clear();
        output.success("Search history cleared");
        return Ok(());
    }

    let history = session.history();
    let last_searched = session.favorites().last_searched();

    if !output.is_human() {
        output.json(&json!({
            "recent": history.recent(),
            "last_query": history.last_query(),
            "last_searched": last_searched.map(|m| json!({ "id": m.id, "title": m.title })),
        }));
        return Ok(());
    }

    if history.recent().is_empty() {
        output.println(output.muted("No recent searches"));
    } else {
        output.println(output.heading("Recent searches"));
        for (idx, query) in history.recent().iter().enumerate() {
            output.println(format!("  {}. {}", idx + 1, output.accent(query)));
        }
    }

    if let Some(movie) = last_searched {
        output.println(format!("\nLast viewed: {} {}", output.accent(&movie.title), output.muted(&format!("[{}]", movie.id))));
    }
    Ok(())
}
