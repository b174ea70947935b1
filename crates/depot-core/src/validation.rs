//! # Validation Module
//!
//! Input validation rules for Depot.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (menus, prompts)                                │
//! │  └── Collects raw strings and numbers                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service Facade (depot-service)                               │
//! │  ├── THIS MODULE: normalizes and checks every field                    │
//! │  └── Cross-entity rules (category must exist and be active)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints (sku, username, category name)                 │
//! │  ├── CHECK constraints (non-negative quantities)                       │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule returns the normalized value (trimmed, case-folded, rounded)
//! so callers store exactly what was checked. Checks run in a fixed order
//! and the first failure is reported.
//!
//! ## Usage
//! ```rust
//! use depot_core::validation::{validate_price, validate_sku, validate_stock};
//!
//! let sku = validate_sku("coke-330").unwrap();
//! assert_eq!(sku, "COKE-330");
//!
//! let price = validate_price(2.499).unwrap();
//! assert_eq!(price.cents(), 250);
//!
//! assert!(validate_stock(-1).is_err());
//! ```

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::UserRole;
use crate::{MAX_PRICE_CENTS, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Field bounds applied before entities are constructed.
pub mod limits {
    pub const USERNAME_MIN: usize = 3;
    pub const USERNAME_MAX: usize = 20;
    pub const PASSWORD_MIN: usize = 8;
    pub const EMAIL_MAX: usize = 100;
    pub const FULL_NAME_MIN: usize = 2;
    pub const FULL_NAME_MAX: usize = 100;
    pub const SKU_MIN: usize = 3;
    pub const SKU_MAX: usize = 50;
    pub const PRODUCT_NAME_MIN: usize = 2;
    pub const PRODUCT_NAME_MAX: usize = 100;
    pub const CATEGORY_NAME_MIN: usize = 2;
    pub const CATEGORY_NAME_MAX: usize = 50;
    pub const DESCRIPTION_MAX: usize = 255;
    pub const LOCATION_MIN: usize = 1;
    pub const LOCATION_MAX: usize = 20;
}

use limits::*;

// =============================================================================
// Patterns
// =============================================================================

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static FULL_NAME_RE: OnceLock<Regex> = OnceLock::new();
static SKU_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("pattern {pattern:?} failed to compile: {error}"))
    })
}

fn username_regex() -> &'static Regex {
    compiled(&USERNAME_RE, "^[a-zA-Z0-9_]{3,20}$")
}

fn email_regex() -> &'static Regex {
    compiled(&EMAIL_RE, r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
}

fn full_name_regex() -> &'static Regex {
    // Length is enforced separately.
    compiled(&FULL_NAME_RE, r"^[a-zA-Z\s]+$")
}

fn sku_regex() -> &'static Regex {
    compiled(&SKU_RE, "^[A-Z0-9-]{3,50}$")
}

// =============================================================================
// Generic String Validator
// =============================================================================

/// Validates a free-form string field.
///
/// ## Rules
/// - `None` is rejected as "{field} cannot be null"
/// - Surrounding whitespace is trimmed
/// - Blank input is rejected unless `allow_empty`
/// - Length (in characters, after trimming) must be within `min_len..=max_len`
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_string;
///
/// assert_eq!(validate_string(Some("  Aisle 4 "), "Location", 0, 20, true).unwrap(), "Aisle 4");
/// assert!(validate_string(None, "Location", 0, 20, true).is_err());
/// assert!(validate_string(Some("   "), "Name", 2, 50, false).is_err());
/// ```
pub fn validate_string(
    value: Option<&str>,
    field: &str,
    min_len: usize,
    max_len: usize,
    allow_empty: bool,
) -> ValidationResult<String> {
    let value = value.ok_or_else(|| ValidationError::Missing {
        field: field.to_string(),
    })?;
    let trimmed = value.trim();

    if !allow_empty && trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }

    let len = trimmed.chars().count();
    if len < min_len {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: min_len,
        });
    }
    if len > max_len {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: max_len,
        });
    }

    Ok(trimmed.to_string())
}

/// Trims and rejects blank input.
fn required<'a>(value: &'a str, field: &str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed)
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a login name: 3-20 characters of `[A-Za-z0-9_]`.
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_username;
///
/// assert_eq!(validate_username(" picker_01 ").unwrap(), "picker_01");
/// assert!(validate_username("ab").is_err());
/// assert!(validate_username("john.doe").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = required(username, "Username")?;

    if !username_regex().is_match(username) {
        return Err(ValidationError::format(
            "Username",
            "must be 3-20 alphanumeric characters or underscores",
        ));
    }

    Ok(username.to_string())
}

/// Validates a plaintext password against the policy.
///
/// ## Rules
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter and one digit
///
/// The password is returned untrimmed; whitespace is part of the secret.
pub fn validate_password(password: &str) -> ValidationResult<String> {
    if password.trim().is_empty() {
        return Err(ValidationError::required("Password"));
    }

    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::TooShort {
            field: "Password".to_string(),
            min: PASSWORD_MIN,
        });
    }

    let checks: [(fn(&char) -> bool, &str); 3] = [
        (char::is_ascii_uppercase, "must contain at least one uppercase letter"),
        (char::is_ascii_lowercase, "must contain at least one lowercase letter"),
        (char::is_ascii_digit, "must contain at least one number"),
    ];
    for (class, reason) in checks {
        if !password.chars().any(|c| class(&c)) {
            return Err(ValidationError::format("Password", reason));
        }
    }

    Ok(password.to_string())
}

/// Validates and lower-cases an email address.
///
/// Accepts `local@domain.tld` where local is `[a-z0-9+_.-]+`, domain is
/// `[a-z0-9.-]+` and the TLD has at least two letters. Max 100 characters.
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_email;
///
/// assert_eq!(validate_email("Ana.Lopez@Depot.IO").unwrap(), "ana.lopez@depot.io");
/// assert!(validate_email("ana@depot").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = required(email, "Email")?.to_lowercase();

    if !email_regex().is_match(&email) {
        return Err(ValidationError::Malformed {
            field: "email".to_string(),
        });
    }

    if email.chars().count() > EMAIL_MAX {
        return Err(ValidationError::TooLong {
            field: "Email".to_string(),
            max: EMAIL_MAX,
        });
    }

    Ok(email)
}

/// Validates a person's full name: 2-100 ASCII letters and spaces.
pub fn validate_full_name(full_name: &str) -> ValidationResult<String> {
    let full_name = validate_string(
        Some(full_name),
        "Full name",
        FULL_NAME_MIN,
        FULL_NAME_MAX,
        false,
    )?;

    if !full_name_regex().is_match(&full_name) {
        return Err(ValidationError::format(
            "Full name",
            "can only contain letters and spaces",
        ));
    }

    Ok(full_name)
}

/// Parses a role name, case-insensitively.
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_role;
/// use depot_core::UserRole;
///
/// assert_eq!(validate_role("receiver").unwrap(), UserRole::Receiver);
/// assert!(validate_role("CASHIER").is_err());
/// ```
pub fn validate_role(role: &str) -> ValidationResult<UserRole> {
    required(role, "Role")?.parse()
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Upper-cased before checking
/// - 3-50 characters of `[A-Z0-9-]`
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_sku;
///
/// assert_eq!(validate_sku("prod-001").unwrap(), "PROD-001");
/// assert!(validate_sku("AB").is_err());
/// assert!(validate_sku("A".repeat(51).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<String> {
    let sku = required(sku, "SKU")?.to_uppercase();

    if !sku_regex().is_match(&sku) {
        return Err(ValidationError::format(
            "SKU",
            "must be 3-50 uppercase alphanumeric characters or hyphens",
        ));
    }

    Ok(sku)
}

/// Validates a product name (2-100 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_string(
        Some(name),
        "Product name",
        PRODUCT_NAME_MIN,
        PRODUCT_NAME_MAX,
        false,
    )
}

/// Validates an optional description (up to 255 characters).
pub fn validate_description(description: &str) -> ValidationResult<String> {
    validate_string(Some(description), "Description", 0, DESCRIPTION_MAX, true)
}

/// Validates a shelf location (1-20 characters).
pub fn validate_location(location: &str) -> ValidationResult<String> {
    validate_string(Some(location), "Location", LOCATION_MIN, LOCATION_MAX, true)
}

/// Validates a category name (2-50 characters).
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    validate_string(
        Some(name),
        "Category name",
        CATEGORY_NAME_MIN,
        CATEGORY_NAME_MAX,
        false,
    )
}

/// Validates a unit price and converts it to [`Money`].
///
/// ## Rules
/// - Must be a finite number
/// - Must be at least 0 and at most 999,999.99
/// - Rounded to cents, half away from zero
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_price;
///
/// assert_eq!(validate_price(99.999).unwrap().cents(), 10_000);
/// assert!(validate_price(-1.0).is_err());
/// assert!(validate_price(1_000_000.0).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<Money> {
    if !price.is_finite() {
        return Err(ValidationError::format("Price", "must be a number"));
    }

    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: "Price".to_string(),
        });
    }

    let max = Money::from_cents(MAX_PRICE_CENTS);
    if price > max.as_decimal() {
        return Err(ValidationError::TooLarge {
            field: "Price".to_string(),
            max: "999,999.99".to_string(),
        });
    }

    Money::round_from_decimal(price)
        .map(|money| money.min(max))
        .ok_or_else(|| ValidationError::format("Price", "must be a number"))
}

/// Validates a stock quantity (0 to 1,000,000 inclusive).
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_stock;
///
/// assert_eq!(validate_stock(1_000_000).unwrap(), 1_000_000);
/// assert!(validate_stock(1_000_001).is_err());
/// ```
pub fn validate_stock(stock: i64) -> ValidationResult<i64> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "Stock".to_string(),
        });
    }

    if stock > MAX_STOCK {
        return Err(ValidationError::TooLarge {
            field: "Stock quantity".to_string(),
            max: "1,000,000".to_string(),
        });
    }

    Ok(stock)
}

/// Validates a reorder threshold. Same bounds as [`validate_stock`].
pub fn validate_min_stock(min_stock: i64) -> ValidationResult<i64> {
    if min_stock < 0 {
        return Err(ValidationError::Negative {
            field: "Minimum stock".to_string(),
        });
    }

    if min_stock > MAX_STOCK {
        return Err(ValidationError::TooLarge {
            field: "Minimum stock".to_string(),
            max: "1,000,000".to_string(),
        });
    }

    Ok(min_stock)
}

// =============================================================================
// Unit Tests
// =============================================================================
