use crag_catalog::{Catalog, Comment, CommentPool, CommentTag, Headland, Route, Sector};

use super::state::AppState;

pub(crate) fn catalog() -> Catalog {
    let mut lekker = Route::new("lekker-time", "Lekker Time")
        .with_grade(19)
        .with_info("(T)")
        .with_route_number(1);
    lekker.tags = vec!["crimpy".into()];

    Catalog::new(vec![
        Headland {
            slug: "cape-point".into(),
            name: "Cape Point".into(),
            description: String::new(),
            sectors: vec![Sector {
                slug: "the-slabs".into(),
                name: "The Slabs".into(),
                description: "Sunny slabs".into(),
                routes: vec![
                    lekker,
                    Route::new("the-nose", "The Nose")
                        .with_grade(26)
                        .with_info("5B&C")
                        .with_route_number(2),
                    Route::new("easy-street", "Easy Street")
                        .with_grade(12)
                        .with_info("S")
                        .with_route_number(3),
                ],
            }],
        },
        Headland {
            slug: "muizenberg".into(),
            name: "Muizenberg".into(),
            description: String::new(),
            sectors: vec![Sector {
                slug: "boyes-drive".into(),
                name: "Boyes Drive".into(),
                description: String::new(),
                routes: vec![Route::new("midnight-lightning", "Midnight Lightning")],
            }],
        },
    ])
}

/// Twenty comments; every fifth one is beta.
pub(crate) fn comments() -> CommentPool {
    CommentPool::new(
        (0..20)
            .map(|i| Comment {
                id: format!("c{i}"),
                user_id: format!("u{i}"),
                username: format!("climber{i}"),
                user_image: None,
                content: format!("Comment number {i}"),
                created_at: "2025-02-26T10:00:00Z".into(),
                tags: if i % 5 == 0 {
                    vec![CommentTag::Beta]
                } else {
                    vec![]
                },
            })
            .collect(),
    )
}

pub(crate) fn state() -> AppState {
    AppState::new(catalog(), comments())
}
