use crate::core::distance::distance_km;
use crate::models::{FilterCriteria, GeoError, GeoPoint, Property};

/// Check the free-text predicate: case-insensitive substring on the address
///
/// An empty search string is inactive and passes everything.
#[inline]
pub fn matches_search(property: &Property, search_text: &str) -> bool {
    let needle = search_text.trim();
    if needle.is_empty() {
        return true;
    }
    property
        .address
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Check the numeric threshold predicates (beds/baths/parking)
#[inline]
pub fn matches_thresholds(property: &Property, criteria: &FilterCriteria) -> bool {
    if let Some(min_beds) = criteria.min_beds {
        if property.beds < min_beds {
            return false;
        }
    }

    if let Some(min_baths) = criteria.min_baths {
        // Baths can be fractional (e.g. 2.5), minimums are whole numbers
        if property.baths < min_baths as f64 {
            return false;
        }
    }

    if let Some(min_parking) = criteria.min_parking {
        if property.parking_spaces < min_parking {
            return false;
        }
    }

    true
}

/// Check the categorical and price-bracket predicates
#[inline]
pub fn matches_category(property: &Property, criteria: &FilterCriteria) -> bool {
    if let Some(home_type) = criteria.home_type {
        if property.home_type != home_type {
            return false;
        }
    }

    if let Some(range) = criteria.price_range {
        if !range.contains(property.price) {
            return false;
        }
    }

    true
}

/// Check the radius predicate against an origin point
///
/// Active only when both the radius and the origin are supplied; with no
/// origin the predicate is skipped entirely, not treated as failing.
#[inline]
pub fn within_radius(
    property: &Property,
    radius_km: Option<f64>,
    origin: Option<GeoPoint>,
) -> Result<bool, GeoError> {
    match (radius_km, origin) {
        (Some(radius), Some(origin)) => {
            Ok(distance_km(origin, property.location)? <= radius)
        }
        _ => Ok(true),
    }
}

/// Apply every active predicate to the catalog, AND-combined
///
/// Order-preserving and non-mutating: the output is a subset of the input
/// in input order. An all-empty criteria returns the input unchanged.
pub fn apply(
    properties: &[Property],
    criteria: &FilterCriteria,
    origin: Option<GeoPoint>,
) -> Result<Vec<Property>, GeoError> {
    let mut filtered = Vec::with_capacity(properties.len());
    for property in properties {
        if matches_search(property, &criteria.search_text)
            && matches_thresholds(property, criteria)
            && matches_category(property, criteria)
            && within_radius(property, criteria.radius_km, origin)?
        {
            filtered.push(property.clone());
        }
    }

    tracing::trace!(
        total = properties.len(),
        kept = filtered.len(),
        "filter pipeline applied"
    );

    Ok(filtered)
}

/// Distance from an origin to a property for display, rounded to one decimal
pub fn distance_to(origin: GeoPoint, property: &Property) -> Result<f64, GeoError> {
    let exact = distance_km(origin, property.location)?;
    Ok((exact * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HomeType, ListingKind, PriceRange};

    fn create_property(id: u64, address: &str, price: f64, beds: u32, lat: f64, lng: f64) -> Property {
        Property {
            id,
            address: address.to_string(),
            price,
            beds,
            baths: 2.0,
            home_type: HomeType::House,
            parking_spaces: 1,
            listing_kind: ListingKind::Sale,
            location: GeoPoint { lat, lng },
        }
    }

    fn create_catalog() -> Vec<Property> {
        vec![
            create_property(1, "123 MG Road, Bengaluru, Karnataka", 6_500_000.0, 3, 12.9716, 77.5946),
            create_property(2, "456 Malabar Hill, Mumbai, Maharashtra", 8_500_000.0, 2, 19.2288, 72.8372),
            create_property(3, "789 Golf Course Road, Gurugram, Haryana", 12_500_000.0, 4, 28.4595, 77.0266),
        ]
    }

    #[test]
    fn test_empty_criteria_returns_input_unchanged() {
        let catalog = create_catalog();
        let result = apply(&catalog, &FilterCriteria::default(), None).unwrap();

        assert_eq!(result.len(), catalog.len());
        let ids: Vec<u64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_text_filter_case_insensitive() {
        let catalog = create_catalog();
        let criteria = FilterCriteria {
            search_text: "bengaluru".to_string(),
            ..Default::default()
        };

        let result = apply(&catalog, &criteria, None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn test_min_beds_threshold() {
        let catalog = create_catalog();
        let criteria = FilterCriteria {
            min_beds: Some(3),
            ..Default::default()
        };

        let result = apply(&catalog, &criteria, None).unwrap();
        let ids: Vec<u64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_fractional_baths_pass_whole_minimum() {
        let mut property = create_property(1, "Test", 1_000_000.0, 2, 12.97, 77.59);
        property.baths = 2.5;

        let criteria = FilterCriteria {
            min_baths: Some(2),
            ..Default::default()
        };
        assert!(matches_thresholds(&property, &criteria));

        let criteria = FilterCriteria {
            min_baths: Some(3),
            ..Default::default()
        };
        assert!(!matches_thresholds(&property, &criteria));
    }

    #[test]
    fn test_price_bracket_filter() {
        let catalog = create_catalog();
        let criteria = FilterCriteria {
            price_range: Some(PriceRange::between(6_000_000.0, 9_000_000.0)),
            ..Default::default()
        };

        let result = apply(&catalog, &criteria, None).unwrap();
        let ids: Vec<u64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_open_price_bracket() {
        let catalog = create_catalog();
        let criteria = FilterCriteria {
            price_range: Some(PriceRange::above(10_000_000.0)),
            ..Default::default()
        };

        let result = apply(&catalog, &criteria, None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[test]
    fn test_radius_filter_with_origin() {
        let catalog = create_catalog();
        let bengaluru = GeoPoint { lat: 12.9716, lng: 77.5946 };

        // 900 km keeps Bengaluru (~0 km) and Mumbai (~837 km)
        let criteria = FilterCriteria {
            radius_km: Some(900.0),
            ..Default::default()
        };
        let result = apply(&catalog, &criteria, Some(bengaluru)).unwrap();
        let ids: Vec<u64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        // 100 km keeps only Bengaluru
        let criteria = FilterCriteria {
            radius_km: Some(100.0),
            ..Default::default()
        };
        let result = apply(&catalog, &criteria, Some(bengaluru)).unwrap();
        let ids: Vec<u64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_radius_skipped_without_origin() {
        let catalog = create_catalog();
        let criteria = FilterCriteria {
            radius_km: Some(50.0),
            ..Default::default()
        };

        // Same result as with no radius criterion at all
        let with_radius = apply(&catalog, &criteria, None).unwrap();
        let without = apply(&catalog, &FilterCriteria::default(), None).unwrap();
        assert_eq!(with_radius.len(), without.len());
    }

    #[test]
    fn test_combined_predicates_are_anded() {
        let catalog = create_catalog();
        let criteria = FilterCriteria {
            search_text: "Road".to_string(),
            min_beds: Some(4),
            ..Default::default()
        };

        // "Road" matches 1 and 3, but only 3 has 4 beds
        let result = apply(&catalog, &criteria, None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[test]
    fn test_distance_to_rounds_one_decimal() {
        let bengaluru = GeoPoint { lat: 12.9716, lng: 77.5946 };
        let mumbai = create_property(2, "Mumbai", 8_500_000.0, 2, 19.2288, 72.8372);

        let display = distance_to(bengaluru, &mumbai).unwrap();
        let tenths = display * 10.0;
        assert!((tenths - tenths.round()).abs() < 1e-6, "expected one decimal, got {}", display);
        assert!((display - 837.0).abs() < 10.0);
    }
}
