use crag_catalog::{Catalog, Headland, Route, Sector};

pub(crate) fn catalog() -> Catalog {
    Catalog::new(vec![
        Headland {
            slug: "cape-point".into(),
            name: "Cape Point".into(),
            description: String::new(),
            sectors: vec![Sector {
                slug: "the-slabs".into(),
                name: "The Slabs".into(),
                description: "Sunny slabs above the beach".into(),
                routes: vec![
                    Route::new("lekker-time", "Lekker Time").with_grade(19),
                    Route::new("the-nose", "The Nose").with_grade(26),
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
                routes: vec![
                    Route::new("slab-happy", "Slab Happy").with_grade(15),
                    Route::new("midnight-lightning", "Midnight Lightning"),
                ],
            }],
        },
    ])
}
