//! `polymath query` — One-shot or interactive querying with expertise.

use crate::expertise_target;
use polymath_orchestrator::Orchestrator;
use std::io::{BufRead, Write};

pub async fn run(
    message: Option<String>,
    expertise: Vec<String>,
    context: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut orchestrator = Orchestrator::from_default_config()?;

    for target in &expertise {
        let loaded = match expertise_target(target) {
            Some(path) => orchestrator.load_expertise(&path),
            None => orchestrator.load_cached_expertise(target),
        };
        match loaded {
            Ok(_) => println!("🔌 Loaded expertise: {target}"),
            Err(e) => return Err(format!("Failed to load expertise '{target}': {e}").into()),
        }
    }

    match message {
        Some(message) => {
            let answer = orchestrator.query(&message, context.as_deref()).await?;
            println!("{answer}");
        }
        None => interactive(&mut orchestrator, context.as_deref()).await?,
    }

    Ok(())
}

async fn interactive(
    orchestrator: &mut Orchestrator,
    extra_context: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Polymath interactive mode. Empty line or Ctrl-D exits.");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let prompt = line?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            break;
        }

        match orchestrator.query(prompt, extra_context).await {
            Ok(answer) => {
                println!("{answer}\n");
                // Keep the exchange on the conversation stack so later
                // turns see it through the recency window.
                orchestrator.push_context(format!("User: {prompt}"));
                orchestrator.push_context(format!("Assistant: {answer}"));
            }
            Err(e) => eprintln!("query failed: {e}"),
        }
    }

    orchestrator.shutdown();
    Ok(())
}
