//! Time-ordered identifiers shared by every entity.
//!
//! Identifiers are UUID v7 values minted by the application, so rows sort by
//! creation time and ids never depend on a database sequence.

macro_rules! define_entity_id {
    ($(#[$outer:meta])* $name:ident, $label:literal) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            #[doc = concat!("Mint a fresh time-ordered ", $label, " identifier.")]
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::now_v7())
            }

            #[doc = concat!("Wrap an existing UUID as a ", $label, " identifier.")]
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use define_entity_id;

#[cfg(test)]
mod tests {
    define_entity_id!(
        /// Identifier used only by these tests.
        SampleId,
        "sample"
    );

    #[test]
    fn generated_ids_are_version_seven() {
        let id = SampleId::generate();
        assert_eq!(id.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn generated_ids_sort_by_creation() {
        let first = SampleId::generate();
        let second = SampleId::generate();
        assert!(first < second);
    }

    #[test]
    fn parses_and_displays_hyphenated_text() {
        let raw = "0192f1a4-5b6c-7d8e-9f01-23456789abcd";
        let id: SampleId = raw.parse().expect("valid uuid");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn serialises_as_bare_string() {
        let id = SampleId::from_uuid(uuid::Uuid::nil());
        let json = serde_json::to_string(&id).expect("id serialises");
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
