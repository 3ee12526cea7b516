use anyhow::bail;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use crate::{data_manager::DataManager, models::MoviePatch};

#[derive(Debug, Parser)]
#[command(name = "moviweb")]
#[command(author, version, about = "Personal movie lists, enriched from OMDb")]
pub struct Cli {
    /// Database URL, overriding DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),

    /// Manage a user's movies
    #[command(subcommand)]
    Movie(MovieCommand),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user
    Add { name: String },

    /// List all users
    List,

    /// Show one user
    Show { id: i32 },

    /// Delete a user and all of their movies
    Delete { id: i32 },
}

#[derive(Debug, Subcommand)]
pub enum MovieCommand {
    /// List a user's movies
    List { user_id: i32 },

    /// Add a movie, looking it up on OMDb when a key is configured
    Add { user_id: i32, title: String },

    /// Change some fields of a movie
    Update {
        movie_id: i32,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        director: Option<String>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Delete a movie
    Delete { movie_id: i32 },
}

/// Runs one command and returns what should be printed.
pub async fn execute(command: Commands, data: &DataManager) -> anyhow::Result<Value> {
    let out = match command {
        Commands::User(cmd) => match cmd {
            UserCommand::Add { name } => json!(data.create_user(&name).await?),
            UserCommand::List => json!(data.list_users().await?),
            UserCommand::Show { id } => {
                let Some(user) = data.get_user(id).await? else {
                    bail!("user {id} not found");
                };
                let movies = data.list_movies(id).await?;
                json!({ "user": user, "movies": movies })
            }
            UserCommand::Delete { id } => json!({ "deleted": data.delete_user(id).await? }),
        },
        Commands::Movie(cmd) => match cmd {
            MovieCommand::List { user_id } => json!(data.list_movies(user_id).await?),
            MovieCommand::Add { user_id, title } => json!(data.add_movie(user_id, &title).await?),
            MovieCommand::Update { movie_id, title, director, year } => {
                let patch = MoviePatch { name: title, director, year };
                if patch.is_empty() {
                    bail!("nothing to update: pass --title, --director or --year");
                }
                let Some(movie) = data.update_movie(movie_id, patch).await? else {
                    bail!("movie {movie_id} not found");
                };
                json!(movie)
            }
            MovieCommand::Delete { movie_id } => {
                json!({ "deleted": data.delete_movie(movie_id).await? })
            }
        },
    };
    Ok(out)
}
