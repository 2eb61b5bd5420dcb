//! In-memory joining and view derivation for the theater catalog.
//!
//! This crate provides:
//! - [`Catalog`] — the three entity tables plus the relational joiner
//! - [`View`] — the filter/sort pipeline used for list pages and cast lists

pub mod catalog;
pub mod pipeline;

pub use catalog::Catalog;
pub use pipeline::{Direction, View, category_eq};

#[cfg(test)]
mod tests {
    use super::*;
    use stagedoor_source::CsvSource;

    fn fixture_dir() -> String {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../../fixtures/csv").to_string()
    }

    #[tokio::test]
    async fn csv_fixture_joins_end_to_end() {
        let tables = CsvSource::new(&fixture_dir()).unwrap().load().await.unwrap();
        let catalog = Catalog::new(tables.actors, tables.characters, tables.plays);

        let shorts = catalog.actor_shorts();
        assert_eq!(shorts.len(), 3);
        let imogen = shorts.iter().find(|s| s.first_name == "Imogen").unwrap();
        assert_eq!(imogen.character_count, 2);
        assert_eq!(imogen.principal_count, 1);

        let hamnet = catalog.play_detail(stagedoor_shared::PlayId(1)).unwrap();
        assert_eq!(hamnet.play.title, "Hamnet");
        assert_eq!(hamnet.characters.len(), 3);
    }

    #[tokio::test]
    async fn ham_query_matches_hamlet_and_hamnet() {
        let tables = CsvSource::new(&fixture_dir()).unwrap().load().await.unwrap();
        let catalog = Catalog::new(tables.actors, tables.characters, tables.plays);

        let characters = catalog.characters();
        let matched = View::of(characters)
            .search("ham", |c| vec![c.name.clone()])
            .collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Hamlet");

        let plays = catalog.play_shorts();
        let matched = View::of(&plays)
            .search("HAM", |p| vec![p.title.clone()])
            .collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Hamnet");
    }
}
