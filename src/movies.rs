use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::{
    entities::movie,
    error::DataResult,
    models::{Movie, MoviePatch, NewMovie, dedup_key},
};

#[derive(Clone)]
pub struct MovieRepository {
    db: DatabaseConnection,
}

impl MovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a movie. The owning user is checked by the foreign key only,
    /// and a title whose key the user already has fails on the unique index.
    pub async fn add(&self, new: NewMovie) -> DataResult<Movie> {
        let model = movie::ActiveModel {
            name_key: Set(dedup_key(&new.name)),
            name: Set(new.name),
            director: Set(new.director),
            year: Set(new.year),
            poster_url: Set(new.poster_url),
            user_id: Set(new.user_id),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_for_user(&self, user_id: i32) -> DataResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .order_by_asc(movie::Column::Name)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get(&self, movie_id: i32) -> DataResult<Option<Movie>> {
        Ok(movie::Entity::find_by_id(movie_id).one(&self.db).await?)
    }

    /// Case-insensitive title match among one user's movies.
    pub async fn find_by_title(&self, user_id: i32, title: &str) -> DataResult<Option<Movie>> {
        let movie = movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .filter(movie::Column::NameKey.eq(dedup_key(title)))
            .one(&self.db)
            .await?;
        Ok(movie)
    }

    /// Applies the supplied fields of `patch`; `None` if the movie is gone.
    pub async fn update(&self, movie_id: i32, patch: MoviePatch) -> DataResult<Option<Movie>> {
        let txn = self.db.begin().await?;

        let updated = match movie::Entity::find_by_id(movie_id).one(&txn).await? {
            None => None,
            Some(existing) if patch.is_empty() => Some(existing),
            Some(existing) => {
                let mut active: movie::ActiveModel = existing.into();
                if let Some(name) = patch.name {
                    active.name_key = Set(dedup_key(&name));
                    active.name = Set(name);
                }
                if let Some(director) = patch.director {
                    active.director = Set(Some(director));
                }
                if let Some(year) = patch.year {
                    active.year = Set(Some(year));
                }
                Some(active.update(&txn).await?)
            }
        };

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, movie_id: i32) -> DataResult<bool> {
        let res = movie::Entity::delete_by_id(movie_id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, users::UserRepository};

    async fn setup() -> (MovieRepository, UserRepository, i32) {
        let db = db::memory().await;
        let users = UserRepository::new(db.clone());
        let owner = users.add("Alice").await.unwrap();
        (MovieRepository::new(db), users, owner.id)
    }

    fn titled(user_id: i32, name: &str) -> NewMovie {
        NewMovie { user_id, name: name.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn add_keeps_all_fields() {
        let (movies, _, user_id) = setup().await;
        let added = movies
            .add(NewMovie {
                user_id,
                name: "Inception".to_string(),
                director: Some("Christopher Nolan".to_string()),
                year: Some(2010),
                poster_url: Some("https://img.example/inception.jpg".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(added.name, "Inception");
        assert_eq!(added.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(added.year, Some(2010));
        assert_eq!(added.user_id, user_id);
        assert_eq!(movies.get(added.id).await.unwrap(), Some(added));
    }

    #[tokio::test]
    async fn list_is_ordered_by_name_and_scoped_to_user() {
        let (movies, users, user_id) = setup().await;
        let other = users.add("Bob").await.unwrap();
        for name in ["Memento", "Alien", "Heat"] {
            movies.add(titled(user_id, name)).await.unwrap();
        }
        movies.add(titled(other.id, "Brazil")).await.unwrap();

        let names: Vec<String> =
            movies.list_for_user(user_id).await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["Alien", "Heat", "Memento"]);
    }

    #[tokio::test]
    async fn unknown_owner_violates_foreign_key() {
        let (movies, _, user_id) = setup().await;
        assert!(movies.add(titled(user_id + 100, "Heat")).await.is_err());
        assert!(movies.list_for_user(user_id + 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_only_touches_supplied_fields() {
        let (movies, _, user_id) = setup().await;
        let added = movies
            .add(NewMovie {
                user_id,
                name: "Inceptoin".to_string(),
                director: Some("Christopher Nolan".to_string()),
                year: Some(2010),
                poster_url: Some("https://img.example/p.jpg".to_string()),
            })
            .await
            .unwrap();

        let patch = MoviePatch { name: Some("Inception".to_string()), ..Default::default() };
        let updated = movies.update(added.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Inception");
        assert_eq!(updated.director, added.director);
        assert_eq!(updated.year, added.year);
        assert_eq!(updated.poster_url, added.poster_url);
        assert_eq!(movies.get(added.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn empty_patch_returns_the_stored_movie() {
        let (movies, _, user_id) = setup().await;
        let added = movies.add(titled(user_id, "Heat")).await.unwrap();

        let same = movies.update(added.id, MoviePatch::default()).await.unwrap();
        assert_eq!(same, Some(added));
    }

    #[tokio::test]
    async fn update_of_missing_movie_is_none() {
        let (movies, _, _) = setup().await;
        let patch = MoviePatch { year: Some(1995), ..Default::default() };
        assert_eq!(movies.update(42, patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_missing_movie_is_false() {
        let (movies, _, user_id) = setup().await;
        let added = movies.add(titled(user_id, "Heat")).await.unwrap();

        assert!(movies.delete(added.id).await.unwrap());
        assert!(!movies.delete(added.id).await.unwrap());
        assert!(!movies.delete(9999).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_owner_cascades() {
        let (movies, users, user_id) = setup().await;
        movies.add(titled(user_id, "Heat")).await.unwrap();
        movies.add(titled(user_id, "Alien")).await.unwrap();
        assert_eq!(movies.list_for_user(user_id).await.unwrap().len(), 2);

        assert!(users.delete(user_id).await.unwrap());
        assert!(movies.list_for_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn title_key_is_unique_per_user() {
        let (movies, users, user_id) = setup().await;
        let other = users.add("Bob").await.unwrap();
        movies.add(titled(user_id, "Heat")).await.unwrap();
        let alien = movies.add(titled(user_id, "Alien")).await.unwrap();

        assert!(movies.add(titled(user_id, " heat")).await.is_err());
        movies.add(titled(other.id, "HEAT")).await.unwrap();

        let patch = MoviePatch { name: Some("HEAT".to_string()), ..Default::default() };
        assert!(movies.update(alien.id, patch).await.is_err());
        assert_eq!(movies.get(alien.id).await.unwrap().unwrap().name, "Alien");
    }

    #[tokio::test]
    async fn rename_updates_the_title_key() {
        let (movies, _, user_id) = setup().await;
        let added = movies.add(titled(user_id, "Inceptoin")).await.unwrap();

        let patch = MoviePatch { name: Some("Inception".to_string()), ..Default::default() };
        movies.update(added.id, patch).await.unwrap();

        assert!(movies.find_by_title(user_id, "inception").await.unwrap().is_some());
        assert!(movies.find_by_title(user_id, "inceptoin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_title_ignores_case() {
        let (movies, _, user_id) = setup().await;
        let heat = movies.add(titled(user_id, "Heat")).await.unwrap();

        assert_eq!(movies.find_by_title(user_id, "  HEAT").await.unwrap(), Some(heat));
        assert_eq!(movies.find_by_title(user_id, "Heat 2").await.unwrap(), None);
    }
}
