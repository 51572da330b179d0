//! Cache key derivation.
//!
//! Pure functions mapping a resource kind and its parameters to a canonical
//! key string. Keys are `:`-separated and carry a leading `bus`/`train`
//! namespace, so the two agencies can never collide even when their route
//! identifiers coincide. Route and direction identifiers in both agency
//! schemas are drawn from letters, digits, spaces, and dashes; `:` cannot
//! appear inside them, which keeps distinct parameter tuples distinct.

/// Full bus route list.
pub const BUS_ROUTES: &str = "bus:routes";

/// Full train route list.
pub const TRAIN_ROUTES: &str = "train:routes";

/// Patterns (shape points) for one bus route.
pub fn pattern(route: &str) -> String {
    format!("bus:pattern:{route}")
}

/// Directions served by one bus route.
pub fn direction(route: &str) -> String {
    format!("bus:direction:{route}")
}

/// Stops for one bus route in one direction.
pub fn stops(route: &str, direction: &str) -> String {
    format!("bus:stops:{route}:{direction}")
}

/// Stops for one train route (train stop lists are per route).
pub fn train_stops(route: &str) -> String {
    format!("train:stops:{route}")
}

/// Locale bundle for a namespace/language pair.
pub fn locale(namespace: &str, language: &str) -> String {
    format!("locale:{namespace}:{language}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constant_keys() {
        assert_eq!(BUS_ROUTES, "bus:routes");
        assert_eq!(TRAIN_ROUTES, "train:routes");
        assert_ne!(BUS_ROUTES, TRAIN_ROUTES);
    }

    #[test]
    fn parameterized_keys() {
        assert_eq!(pattern("22"), "bus:pattern:22");
        assert_eq!(direction("22"), "bus:direction:22");
        assert_eq!(stops("22", "Northbound"), "bus:stops:22:Northbound");
        assert_eq!(train_stops("red"), "train:stops:red");
        assert_eq!(locale("common", "en"), "locale:common:en");
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(stops("8", "Southbound"), stops("8", "Southbound"));
        assert_eq!(pattern("x9"), pattern("x9"));
    }

    #[test]
    fn kinds_never_collide_for_the_same_route() {
        let keys = [
            pattern("1"),
            direction("1"),
            stops("1", ""),
            train_stops("1"),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    // A dash inside a route id must not be mistaken for a parameter
    // boundary.
    #[test]
    fn dashed_route_is_not_a_boundary() {
        assert_ne!(stops("1-North", ""), stops("1", "North"));
    }

    #[test]
    fn bus_and_train_namespaces_are_disjoint() {
        assert_ne!(stops("1", ""), train_stops("1"));
    }

    proptest! {
        #[test]
        fn stops_keys_are_injective(
            r1 in "[A-Za-z0-9 -]{1,8}",
            d1 in "[A-Za-z0-9 -]{1,8}",
            r2 in "[A-Za-z0-9 -]{1,8}",
            d2 in "[A-Za-z0-9 -]{1,8}",
        ) {
            prop_assume!((&r1, &d1) != (&r2, &d2));
            prop_assert_ne!(stops(&r1, &d1), stops(&r2, &d2));
        }

        #[test]
        fn same_route_distinct_kinds(route in "[A-Za-z0-9 -]{1,8}") {
            prop_assert_ne!(pattern(&route), direction(&route));
            prop_assert_ne!(pattern(&route), train_stops(&route));
        }
    }
}
