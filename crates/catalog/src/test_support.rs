use crate::catalog::Catalog;
use crate::model::{Headland, Route, Sector};

/// Two headlands, three sectors (one empty), three routes.
pub(crate) fn sample() -> Catalog {
    Catalog::new(vec![
        Headland {
            slug: "cape-point".into(),
            name: "Cape Point".into(),
            description: String::new(),
            sectors: vec![
                Sector {
                    slug: "the-slabs".into(),
                    name: "The Slabs".into(),
                    description: "Sunny slabs".into(),
                    routes: vec![
                        Route::new("lekker-time", "Lekker Time")
                            .with_grade(19)
                            .with_info("(T)"),
                        Route::new("the-nose", "The Nose")
                            .with_grade(26)
                            .with_info("5B&C"),
                    ],
                },
                Sector {
                    slug: "bluff".into(),
                    name: "Bluff".into(),
                    description: String::new(),
                    routes: vec![],
                },
            ],
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
