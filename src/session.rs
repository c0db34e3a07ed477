use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Supplies the value of the `Authorization` header for authenticated calls.
pub trait AuthProvider {
    fn authorization(&self) -> String;
}

/// Token returned by a successful login. Held by the caller for the rest of
/// the run; the server decides at call time whether it is still valid.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Session { token: token.into() }
    }
}

impl AuthProvider for Session {
    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// The login response is matched like a loosely typed decoder would: the
// token key in any letter case, the last occurrence wins, other keys ignored.
impl<'de> Deserialize<'de> for Session {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SessionVisitor;

        impl<'de> Visitor<'de> for SessionVisitor {
            type Value = Session;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with a token field")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Session, M::Error> {
                let mut token = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key.eq_ignore_ascii_case("token") {
                        token = Some(map.next_value::<String>()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                token
                    .map(Session::new)
                    .ok_or_else(|| de::Error::missing_field("token"))
            }
        }

        deserializer.deserialize_map(SessionVisitor)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}
