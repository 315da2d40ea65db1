use clap::Subcommand;

use crate::common::{open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Register a new category
    Add {
        /// Display label
        label: String,
        /// Color classes used by front-ends
        #[arg(long, default_value = "bg-gray-100 text-gray-700 border-gray-200")]
        color: String,
    },
    /// List categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename or recolor a category
    Update {
        /// Category ID
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category (tasks keep their category key)
    Delete {
        /// Category ID
        id: String,
    },
}

pub fn run(action: CategoryAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        CategoryAction::Add { label, color } => {
            let category = planner.add_category(&label, &color)?;
            println!("Category created: {}", category.id);
        }
        CategoryAction::List { json } => {
            let categories = planner.categories()?;
            if json {
                print_json(&categories)?;
            } else {
                for category in &categories {
                    println!("{:<38} {}", category.id, category.label);
                }
            }
        }
        CategoryAction::Update { id, label, color } => {
            if label.is_none() && color.is_none() {
                return Err("nothing to update".into());
            }
            let category = planner.update_category(&id, label.as_deref(), color.as_deref())?;
            print_json(&category)?;
        }
        CategoryAction::Delete { id } => {
            if !planner.remove_category(&id)? {
                return Err(format!("category not found: {id}").into());
            }
            println!("Category deleted: {id}");
        }
    }
    Ok(())
}
