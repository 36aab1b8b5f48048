use page_core::{
    CatalogueEvent, CatalogueView, PhoneViewer, SearchBox, SearchEvent, ViewerEvent,
};
use shared::domain::PhoneId;
use tracing::debug;

use crate::console::Console;

pub const HELP: &str = "commands: search [text] | select <id> | extra | back | add | cart | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Search(String),
    Select(PhoneId),
    Extra,
    Back,
    Add,
    Cart,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb {
        "search" | "s" => Ok(ConsoleCommand::Search(rest.to_string())),
        "select" | "open" => {
            if rest.is_empty() {
                Err("select needs a phone id".to_string())
            } else {
                Ok(ConsoleCommand::Select(PhoneId::from(rest)))
            }
        }
        "extra" => Ok(ConsoleCommand::Extra),
        "back" => Ok(ConsoleCommand::Back),
        "add" => Ok(ConsoleCommand::Add),
        "cart" => Ok(ConsoleCommand::Cart),
        "help" | "?" | "" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(format!("unknown command '{other}'")),
    }
}

/// Raises the component event a command stands for. Returns `false` once the user quits.
pub fn dispatch_command(console: &Console, command: ConsoleCommand) -> Result<bool, String> {
    debug!(?command, "console command");
    match command {
        ConsoleCommand::Search(text) => {
            console.search.events().emit(SearchEvent::ValueChanged(text));
        }
        ConsoleCommand::Select(phone_id) => {
            if !console.catalogue.is_visible() {
                return Err("the catalogue is not visible; go back first".to_string());
            }
            console
                .catalogue
                .events()
                .emit(CatalogueEvent::PhoneSelected(phone_id));
        }
        ConsoleCommand::Extra => {
            console.catalogue.events().emit(CatalogueEvent::ExtraAction);
        }
        ConsoleCommand::Back => {
            console.viewer.events().emit(ViewerEvent::Back);
        }
        ConsoleCommand::Add => {
            if !console.viewer.is_visible() {
                return Err("open a phone before adding it".to_string());
            }
            let item = console
                .viewer
                .current_item()
                .ok_or_else(|| "the viewer has nothing to add".to_string())?;
            console.viewer.events().emit(ViewerEvent::Add(item));
        }
        ConsoleCommand::Cart | ConsoleCommand::Help => {}
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
