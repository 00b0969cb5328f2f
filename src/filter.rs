use crate::models::{CategoryFilter, GameRecord};

pub fn filter_by_category(records: &[GameRecord], selected: CategoryFilter) -> Vec<&GameRecord> {
    match selected {
        CategoryFilter::All => records.iter().collect(),
        CategoryFilter::Only(category) => records
            .iter()
            .filter(|record| record.category == category)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn record(id: &str, category: Category) -> GameRecord {
        GameRecord {
            id: id.to_string(),
            title: format!("Game {id}"),
            description: String::new(),
            image: "https://example.com/i.jpg".into(),
            download_link: "https://example.com/d".into(),
            category,
            clicks: 0,
            date_added: Utc::now(),
        }
    }

    fn ids(records: &[&GameRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn all_returns_input_unchanged() {
        let catalog = vec![
            record("1", Category::Rpg),
            record("2", Category::Fps),
            record("3", Category::Rpg),
        ];
        let filtered = filter_by_category(&catalog, CategoryFilter::All);
        assert_eq!(ids(&filtered), vec!["1", "2", "3"]);
        assert!(filter_by_category(&[], CategoryFilter::All).is_empty());
    }

    #[test]
    fn category_keeps_matching_records_in_order() {
        let catalog = vec![
            record("1", Category::Rpg),
            record("2", Category::Fps),
            record("3", Category::Rpg),
            record("4", Category::Racing),
            record("5", Category::Rpg),
        ];
        for category in Category::ALL {
            let filtered = filter_by_category(&catalog, CategoryFilter::Only(category));
            assert!(filtered.iter().all(|record| record.category == category));

            let expected: Vec<String> = catalog
                .iter()
                .filter(|record| record.category == category)
                .map(|record| record.id.clone())
                .collect();
            assert_eq!(ids(&filtered), expected);
        }

        let rpg = filter_by_category(&catalog, CategoryFilter::Only(Category::Rpg));
        assert_eq!(ids(&rpg), vec!["1", "3", "5"]);
    }

    #[test]
    fn empty_catalog_filters_to_empty() {
        assert!(filter_by_category(&[], CategoryFilter::Only(Category::Simulation)).is_empty());
    }
}
