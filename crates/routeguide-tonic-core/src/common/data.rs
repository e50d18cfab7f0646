//! Built-in feature set served when no feature database is configured.

use crate::{
    proto::Point,
    store::{Entry, FeatureStore},
};

/// `(name, latitude, longitude)` of every built-in feature, in store order.
pub const BUILTIN_FEATURES: [(&str, i32, i32); 3] = [
    (
        "上海交通大学闵行校区 上海市闵行区东川路800号",
        310_235_000,
        121_437_403,
    ),
    (
        "复旦大学 上海市杨浦区五角场邯郸路220号",
        312_978_870,
        121_503_457,
    ),
    (
        "华东理工大学 上海市徐汇区梅陇路130号",
        311_416_130,
        121_424_904,
    ),
];

/// A store holding [`BUILTIN_FEATURES`].
pub fn builtin_store() -> FeatureStore {
    BUILTIN_FEATURES
        .iter()
        .map(|&(name, latitude, longitude)| {
            Entry::new(
                name,
                Point {
                    latitude,
                    longitude,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_store_is_ordered() {
        let store = builtin_store();
        assert_eq!(store.len(), BUILTIN_FEATURES.len());
        for (feature, (name, ..)) in store.iter().zip(BUILTIN_FEATURES) {
            assert_eq!(feature.name, name);
        }
    }

    #[test]
    fn builtin_lookup() {
        let store = builtin_store();
        let fudan = store
            .lookup(&Point {
                latitude: 312_978_870,
                longitude: 121_503_457,
            })
            .unwrap();
        assert!(fudan.name.starts_with("复旦大学"));
    }
}
