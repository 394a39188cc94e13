//! End-of-run summary.

use console::style;

use crate::download::Aggregate;

/// The summary lines for a persisted aggregate.
pub fn summary_lines(aggregate: &Aggregate) -> Vec<String> {
    vec![
        format!("Collected and saved data for {}:", aggregate.username()),
        format!("Total posts: {}", aggregate.post_count()),
        format!("Total highlights: {}", aggregate.highlight_count()),
    ]
}

/// Print the run summary.
pub fn print_summary(aggregate: &Aggregate) {
    let lines = summary_lines(aggregate);
    println!();
    if let Some((header, rest)) = lines.split_first() {
        println!("{}", style(header).bold());
        for line in rest {
            println!("  {}", line);
        }
    }
}
