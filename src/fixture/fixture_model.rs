use std::fmt;

use serde::{Deserialize, Serialize};

/// Test data for one journey. Loaded once before the flow starts and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub login: LoginData,
    pub checkout: CheckoutData,
}

impl Fixture {
    /// The reference data set: a known demo account paying cash on delivery.
    pub fn sample() -> Self {
        Fixture {
            login: LoginData {
                email: "john@example.com".into(),
                password: "password123".into(),
            },
            checkout: CheckoutData {
                name: "John Doe".into(),
                pincode: "12345".into(),
                address: "123 Test Street".into(),
                city: "Test City".into(),
                payment_method: PaymentMethod::Cod,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutData {
    pub name: String,
    pub pincode: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Value of the payment `<select>`. Only cash on delivery has known
/// post-conditions; anything else is passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Other(String),
}

impl PaymentMethod {
    pub fn as_value(&self) -> &str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Other(value) => value,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("cod") {
            PaymentMethod::Cod
        } else {
            PaymentMethod::Other(value)
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_value().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value())
    }
}
