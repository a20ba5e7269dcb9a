#[cfg(test)]
mod tests {
    use crate::database::entity::{category, post};
    use crate::database::postgres_repo::PostgresPostRepository;
    use gazette_core::ports::PostRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_post_by_id() {
        // Mock the joined (post, category) row the repository selects
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![(
                post::Model {
                    id: 1,
                    title: "Test Post".to_owned(),
                    body: "Body".to_owned(),
                    category_id: 7,
                },
                category::Model {
                    id: 7,
                    name: "general".to_owned(),
                },
            )]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.find_by_id(1).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.title, "Test Post");
        assert_eq!(found.category.name, "general");
    }

    #[tokio::test]
    async fn test_find_post_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<(post::Model, category::Model)>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }
}
