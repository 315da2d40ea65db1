use clap::Subcommand;

use crate::common::{open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Write a new note
    Add {
        /// Note title (may be empty if content is given)
        title: String,
        /// Note body
        #[arg(long, default_value = "")]
        content: String,
    },
    /// List notes, most recently edited first
    List {
        /// Only notes whose title or content contains this text
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one note
    Get {
        /// Note ID
        id: String,
    },
    /// Edit a note's title or content
    Update {
        /// Note ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
}

pub fn run(action: NoteAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        NoteAction::Add { title, content } => {
            let note = planner.add_note(&title, &content)?;
            println!("Note created: {}", note.id);
        }
        NoteAction::List { search, json } => {
            let notes = match search {
                Some(query) => planner.search_notes(&query)?,
                None => planner.notes()?,
            };
            if json {
                print_json(&notes)?;
            } else if notes.is_empty() {
                println!("No notes found.");
            } else {
                let zone = planner.zone();
                for note in &notes {
                    println!(
                        "{}  {}  {}",
                        note.id,
                        zone.to_local(note.updated_at).format("%b %-d, %Y"),
                        note.display_title()
                    );
                }
            }
        }
        NoteAction::Get { id } => {
            let note = planner.note(&id)?;
            print_json(&note)?;
        }
        NoteAction::Update { id, title, content } => {
            if title.is_none() && content.is_none() {
                return Err("nothing to update".into());
            }
            let note = planner.update_note(&id, title.as_deref(), content.as_deref())?;
            println!("Note updated: {}", note.id);
        }
        NoteAction::Delete { id } => {
            if !planner.remove_note(&id)? {
                return Err(format!("note not found: {id}").into());
            }
            println!("Note deleted: {id}");
        }
    }
    Ok(())
}
