//! Terminal front end for the repertoire trainer.
//!
//! trainer list
//! trainer play <name>
//! trainer drill <name> [line-number]

use std::sync::Arc;

use anyhow::{bail, Context};
use repertoire_core::{format_line, rules, DrillOutcome, MoveToken};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use trainer_client::api::RepertoireApi;
use trainer_client::assist::PlayAssist;
use trainer_client::config::ClientConfig;
use trainer_client::drill_session::DrillSession;

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = ClientConfig::from_env();
    let api = RepertoireApi::new(&config)?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] => list(&api).await,
        ["play", name] => play(api, name, &mut input).await,
        ["drill", name] => drill(&api, name, 1, &mut input).await,
        ["drill", name, number] => {
            let number: usize = number.parse().context("line number must be a positive integer")?;
            drill(&api, name, number, &mut input).await
        }
        _ => bail!("usage: trainer list | trainer play <name> | trainer drill <name> [line-number]"),
    }
}

async fn list(api: &RepertoireApi) -> anyhow::Result<()> {
    let repertoires = api.list().await?;
    if repertoires.is_empty() {
        println!("No repertoires saved yet.");
    }
    for r in repertoires {
        println!("{:<30} {:>4} lines   updated {}", r.name, r.lines, r.updated_at);
    }
    Ok(())
}

async fn prompt(input: &mut Input) -> anyhow::Result<Option<String>> {
    use std::io::Write;
    print!("> ");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

async fn play(api: RepertoireApi, name: &str, input: &mut Input) -> anyhow::Result<()> {
    let api = Arc::new(api);
    let mut assist = PlayAssist::new(api.clone(), name);
    println!("Commands: <move> (e.g. e2e4), back, forward, undo, reset, save, name <name>, quit");

    loop {
        println!("\n{}", rules::fen(assist.position()));
        if assist.shown().len() < assist.moves().len() {
            println!(
                "moves: {} | {}",
                format_line(assist.shown()),
                format_line(&assist.moves()[assist.shown().len()..])
            );
        } else {
            println!("moves: {}", format_line(assist.moves()));
        }
        match assist.refresh().await {
            Some(Ok(moves)) if moves.is_empty() => println!("(no saved moves from here)"),
            Some(Ok(moves)) => println!("repertoire: {}", format_line(moves)),
            Some(Err(e)) => println!("could not load suggestions: {e}"),
            None => println!("(enter a repertoire name with `name <name>`)"),
        }

        let Some(cmd) = prompt(input).await? else {
            return Ok(());
        };
        match cmd.as_str() {
            "" => {}
            "quit" | "exit" => return Ok(()),
            "undo" => {
                if assist.undo().is_none() {
                    println!("nothing to undo");
                }
            }
            "back" => {
                if !assist.back() {
                    println!("already at the start");
                }
            }
            "forward" => {
                if !assist.forward() {
                    println!("already at the last move");
                }
            }
            "reset" => assist.reset(),
            "save" => save(&api, &assist).await,
            other if other.starts_with("name ") => {
                assist.set_name(&other["name ".len()..]);
            }
            other => match MoveToken::parse(other) {
                Ok(token) => {
                    if let Err(e) = assist.play(&token) {
                        println!("{e}");
                    }
                }
                Err(e) => println!("{e}"),
            },
        }
    }
}

async fn save(api: &RepertoireApi, assist: &PlayAssist<RepertoireApi>) {
    if assist.name().is_empty() {
        println!("Please enter a repertoire name.");
        return;
    }
    if assist.moves().is_empty() {
        println!("No moves to save.");
        return;
    }
    match api.save(assist.name(), assist.moves()).await {
        Ok(resp) if resp.added => println!("Line saved ({} lines in '{}').", resp.lines, assist.name()),
        Ok(_) => println!("Line was already in '{}'.", assist.name()),
        Err(e) => println!("Failed to save line: {e}"),
    }
}

async fn drill(api: &RepertoireApi, name: &str, number: usize, input: &mut Input) -> anyhow::Result<()> {
    let tree = api
        .get_repertoire(name.trim())
        .await?
        .with_context(|| format!("no repertoire named '{}'", name.trim()))?;
    let mut session = DrillSession::from_tree(&tree)?;

    for (i, line) in session.lines().iter().enumerate() {
        println!("{:>3}. {}", i + 1, format_line(line));
    }
    session.select(number.saturating_sub(1))?;
    println!("Commands: <move>, undo, restart, line <n>, quit");

    loop {
        println!("\nline {}: {}", session.selected() + 1, rules::fen(session.position()));
        if session.drill().is_solved() {
            println!("Line solved!");
        }

        let Some(cmd) = prompt(input).await? else {
            return Ok(());
        };
        match cmd.as_str() {
            "" => {}
            "quit" | "exit" => return Ok(()),
            "undo" => {
                if !session.undo() {
                    println!("nothing to undo");
                }
            }
            "restart" => session.restart(),
            other if other.starts_with("line ") => {
                match other["line ".len()..].trim().parse::<usize>() {
                    Ok(n) if n >= 1 => {
                        if let Err(e) = session.select(n - 1) {
                            println!("{e}");
                        }
                    }
                    _ => println!("line number must be a positive integer"),
                }
            }
            other => {
                let token = match MoveToken::parse(other) {
                    Ok(token) => token,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match session.attempt(&token) {
                    Ok(DrillOutcome::Rejected { expected, got }) => {
                        println!("Wrong move! Expected {expected}, got {got}.")
                    }
                    Ok(DrillOutcome::Accepted { reply: Some(reply) }) => println!("reply: {reply}"),
                    Ok(DrillOutcome::AlreadySolved) => println!("Line already solved; `restart` or pick another."),
                    Ok(_) => {}
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}
