//! Request-shaped operations over users and movies.
//!
//! [`DataManager`] validates input, applies the duplicate policy (trimmed,
//! case-insensitive names and titles) and, when an OMDb key is configured,
//! enriches new movies before they are stored. Lookup trouble never fails an
//! add: the movie is stored with the title as typed.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

use crate::{
    error::{DataError, DataResult, EntityKind},
    models::{
        Movie, MoviePatch, NewMovie, OmdbMovie, User, is_plausible_year, non_blank,
        parse_release_year,
    },
    movies::MovieRepository,
    omdb::OmdbClient,
    users::UserRepository,
};

#[derive(Clone)]
pub struct DataManager {
    users: UserRepository,
    movies: MovieRepository,
    omdb: Option<Arc<OmdbClient>>,
}

impl DataManager {
    /// `omdb` is `None` when no API key is configured; movies are then
    /// always stored verbatim.
    pub fn new(db: DatabaseConnection, omdb: Option<OmdbClient>) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            movies: MovieRepository::new(db),
            omdb: omdb.map(Arc::new),
        }
    }

    pub async fn create_user(&self, name: &str) -> DataResult<User> {
        let name = required(name, "user name")?;

        if self.users.find_by_name(&name).await?.is_some() {
            return Err(DataError::Duplicate { kind: EntityKind::User, name });
        }

        let user =
            self.users.add(&name).await.map_err(|err| err.or_duplicate(EntityKind::User, &name))?;
        info!(user_id = user.id, name = %user.name, "user created");
        Ok(user)
    }

    pub async fn list_users(&self) -> DataResult<Vec<User>> {
        self.users.list_all().await
    }

    pub async fn get_user(&self, user_id: i32) -> DataResult<Option<User>> {
        self.users.get(user_id).await
    }

    pub async fn delete_user(&self, user_id: i32) -> DataResult<bool> {
        let deleted = self.users.delete(user_id).await?;
        if deleted {
            info!(user_id, "user deleted");
        }
        Ok(deleted)
    }

    pub async fn list_movies(&self, user_id: i32) -> DataResult<Vec<Movie>> {
        self.movies.list_for_user(user_id).await
    }

    /// Adds `title` to a user's list, enriched from OMDb when possible.
    pub async fn add_movie(&self, user_id: i32, title: &str) -> DataResult<Movie> {
        let title = required(title, "movie title")?;
        self.ensure_unique_title(user_id, &title, None).await?;

        let new = match self.lookup(&title).await {
            Some(found) => {
                if found.title != title {
                    self.ensure_unique_title(user_id, &found.title, None).await?;
                }
                NewMovie {
                    user_id,
                    name: found.title,
                    director: found.director,
                    year: found.year.as_deref().and_then(parse_release_year),
                    poster_url: found.poster,
                }
            }
            None => NewMovie { user_id, name: title, ..Default::default() },
        };

        let name = new.name.clone();
        let movie = self
            .movies
            .add(new)
            .await
            .map_err(|err| err.or_duplicate(EntityKind::Movie, &name))?;
        info!(movie_id = movie.id, user_id, name = %movie.name, "movie added");
        Ok(movie)
    }

    /// Patches a movie. Blank strings in `patch` count as not supplied.
    pub async fn update_movie(
        &self,
        movie_id: i32,
        patch: MoviePatch,
    ) -> DataResult<Option<Movie>> {
        let patch = MoviePatch {
            name: non_blank(patch.name.as_deref()),
            director: non_blank(patch.director.as_deref()),
            year: patch.year,
        };

        if let Some(year) = patch.year.filter(|year| !is_plausible_year(*year)) {
            return Err(DataError::Validation(format!("{year} is not a plausible release year")));
        }

        let new_name = patch.name.clone();
        if let Some(name) = &new_name {
            let Some(current) = self.movies.get(movie_id).await? else {
                return Ok(None);
            };
            self.ensure_unique_title(current.user_id, name, Some(movie_id)).await?;
        }

        let updated = self.movies.update(movie_id, patch).await.map_err(|err| match &new_name {
            Some(name) => err.or_duplicate(EntityKind::Movie, name),
            None => err,
        })?;
        if updated.is_some() {
            debug!(movie_id, "movie updated");
        }
        Ok(updated)
    }

    pub async fn delete_movie(&self, movie_id: i32) -> DataResult<bool> {
        let deleted = self.movies.delete(movie_id).await?;
        if deleted {
            debug!(movie_id, "movie deleted");
        }
        Ok(deleted)
    }

    async fn lookup(&self, title: &str) -> Option<OmdbMovie> {
        let omdb = self.omdb.as_ref()?;
        match omdb.lookup(title).await {
            Ok(Some(found)) => {
                debug!(query = title, title = %found.title, "OMDb match");
                Some(found)
            }
            Ok(None) => {
                debug!(query = title, "no OMDb match, storing title verbatim");
                None
            }
            Err(err) => {
                warn!(query = title, error = %err, "OMDb lookup failed, storing title verbatim");
                None
            }
        }
    }

    async fn ensure_unique_title(
        &self,
        user_id: i32,
        title: &str,
        except: Option<i32>,
    ) -> DataResult<()> {
        match self.movies.find_by_title(user_id, title).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(DataError::Duplicate { kind: EntityKind::Movie, name: title.to_string() })
            }
            _ => Ok(()),
        }
    }
}

fn required(value: &str, what: &str) -> DataResult<String> {
    non_blank(Some(value)).ok_or_else(|| DataError::Validation(format!("{what} must not be empty")))
}
