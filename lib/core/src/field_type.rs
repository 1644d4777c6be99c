//! Semantic field labels and the domain categories they belong to.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain category a field type belongs to. Bundled datasets are grouped by
/// category, in the order of [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Address,
    Contact,
    Financial,
    Personal,
    Ecommerce,
    System,
    Generic,
    Company,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Address,
        Category::Contact,
        Category::Financial,
        Category::Personal,
        Category::Ecommerce,
        Category::System,
        Category::Generic,
        Category::Company,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Address => "address",
            Category::Contact => "contact",
            Category::Financial => "financial",
            Category::Personal => "personal",
            Category::Ecommerce => "ecommerce",
            Category::System => "system",
            Category::Generic => "generic",
            Category::Company => "company",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

macro_rules! field_types {
    ($($variant:ident => $label:literal, $category:ident;)+) => {
        /// Semantic type of a form field, serialized as its kebab-case label.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum FieldType {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl FieldType {
            /// Every known field type, grouped by category
            pub const ALL: &'static [FieldType] = &[$(FieldType::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(FieldType::$variant => $label,)+
                }
            }

            pub fn category(self) -> Category {
                match self {
                    $(FieldType::$variant => Category::$category,)+
                }
            }
        }

        impl FromStr for FieldType {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($label => Ok(FieldType::$variant),)+
                    other => Err(Error::UnknownFieldType(other.to_string())),
                }
            }
        }
    };
}

field_types! {
    Address => "address", Address;
    Street => "street", Address;
    HouseNumber => "house-number", Address;
    Complement => "complement", Address;
    Neighborhood => "neighborhood", Address;
    City => "city", Address;
    State => "state", Address;
    Country => "country", Address;
    ZipCode => "zip-code", Address;

    Email => "email", Contact;
    Phone => "phone", Contact;
    Mobile => "mobile", Contact;
    Website => "website", Contact;

    CreditCardNumber => "credit-card-number", Financial;
    CardHolder => "card-holder", Financial;
    CardExpiry => "card-expiry", Financial;
    CardCvv => "card-cvv", Financial;
    BankAccount => "bank-account", Financial;
    BankBranch => "bank-branch", Financial;
    PixKey => "pix-key", Financial;

    FullName => "full-name", Personal;
    FirstName => "first-name", Personal;
    LastName => "last-name", Personal;
    BirthDate => "birth-date", Personal;
    Age => "age", Personal;
    Gender => "gender", Personal;
    Cpf => "cpf", Personal;
    Rg => "rg", Personal;
    Passport => "passport", Personal;
    Nationality => "nationality", Personal;

    ProductName => "product-name", Ecommerce;
    Quantity => "quantity", Ecommerce;
    Price => "price", Ecommerce;
    Coupon => "coupon", Ecommerce;
    OrderNumber => "order-number", Ecommerce;

    Username => "username", System;
    Password => "password", System;
    ConfirmPassword => "confirm-password", System;
    Otp => "otp", System;
    Search => "search", System;

    Text => "text", Generic;
    Number => "number", Generic;
    Date => "date", Generic;
    Message => "message", Generic;

    CompanyName => "company-name", Company;
    Cnpj => "cnpj", Company;
    JobTitle => "job-title", Company;
    Department => "department", Company;
    StateRegistration => "state-registration", Company;
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
