//! Descriptor equality, hashing, and construction tests.
//!
//! `InfoDescriptor` equality must cover every field: equal inputs give equal
//! descriptors with equal hashes, and changing any one field breaks
//! equality.

use metro_model::info::{Attributes, InfoDescriptor};
use metro_model::{CollectionPolicy, LifestylePolicy, Version};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct Fields {
    name: String,
    classname: String,
    version: Version,
    lifestyle: LifestylePolicy,
    collection: CollectionPolicy,
    threadsafe: bool,
    attributes: Vec<(String, String)>,
}

impl Fields {
    fn build(&self) -> InfoDescriptor {
        InfoDescriptor::builder(self.classname.clone())
            .name(self.name.clone())
            .version(self.version)
            .lifestyle(self.lifestyle)
            .collection(self.collection)
            .threadsafe(self.threadsafe)
            .attributes(self.attributes.iter().cloned().collect::<Attributes>())
            .build()
            .unwrap()
    }
}

fn lifestyle() -> impl Strategy<Value = LifestylePolicy> {
    prop_oneof![
        Just(LifestylePolicy::Transient),
        Just(LifestylePolicy::Thread),
        Just(LifestylePolicy::Singleton),
    ]
}

fn collection() -> impl Strategy<Value = CollectionPolicy> {
    prop_oneof![
        Just(CollectionPolicy::Weak),
        Just(CollectionPolicy::Soft),
        Just(CollectionPolicy::Hard),
        Just(CollectionPolicy::System),
    ]
}

fn fields() -> impl Strategy<Value = Fields> {
    (
        "[a-z]{1,8}",
        "[a-z]{1,6}(\\.[A-Z][a-z]{0,6}){1,3}",
        (0u32..5, 0u32..5, 0u32..5),
        lifestyle(),
        collection(),
        any::<bool>(),
        proptest::collection::vec(("[a-z]{1,4}", "[a-z0-9]{0,4}"), 0..3),
    )
        .prop_map(
            |(name, classname, (major, minor, micro), lifestyle, collection, threadsafe, attributes)| {
                Fields {
                    name,
                    classname,
                    version: Version::new(major, minor, micro),
                    lifestyle,
                    collection,
                    threadsafe,
                    attributes,
                }
            },
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Equality and hashing
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn identical_fields_are_equal_with_equal_hashes(fields in fields()) {
        let a = fields.build();
        let b = fields.build();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn changing_any_field_breaks_equality(fields in fields(), which in 0usize..7) {
        let original = fields.build();
        let mut changed = fields.clone();
        match which {
            0 => changed.name.push('x'),
            1 => changed.classname.push('X'),
            2 => changed.version = Version::new(fields.version.major() + 1, 0, 0),
            3 => {
                changed.lifestyle = match fields.lifestyle {
                    LifestylePolicy::Transient => LifestylePolicy::Thread,
                    LifestylePolicy::Thread => LifestylePolicy::Singleton,
                    LifestylePolicy::Singleton => LifestylePolicy::Transient,
                }
            }
            4 => {
                changed.collection = match fields.collection {
                    CollectionPolicy::Weak => CollectionPolicy::Soft,
                    CollectionPolicy::Soft => CollectionPolicy::Hard,
                    CollectionPolicy::Hard => CollectionPolicy::System,
                    CollectionPolicy::System => CollectionPolicy::Weak,
                }
            }
            5 => changed.threadsafe = !fields.threadsafe,
            _ => changed.attributes.push(("zzzzz".to_string(), "v".to_string())),
        }
        prop_assert_ne!(original, changed.build());
    }
}

#[test]
fn attribute_order_does_not_affect_equality() {
    let a = InfoDescriptor::builder("acme.Widget")
        .attribute("a", "1")
        .attribute("b", "2")
        .build()
        .unwrap();
    let b = InfoDescriptor::builder("acme.Widget")
        .attribute("b", "2")
        .attribute("a", "1")
        .build()
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn version_participates_in_equality() {
    let a = InfoDescriptor::new(None, "acme.Widget").unwrap();
    let b = InfoDescriptor::builder("acme.Widget")
        .version(Version::new(1, 0, 1))
        .build()
        .unwrap();
    assert_ne!(a, b);
}
