//! Notification type enumeration.
//!
//! Each variant names one domain event of the back office. The variant is
//! decomposed into the resource it concerns and the action that happened,
//! which drives content formatting and recipient resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use natsinternal_core::AppError;

/// Business resource a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationResource {
    /// Back-office user account.
    User,
    /// Customer record.
    Customer,
    /// Product brand.
    Brand,
    /// Product.
    Product,
    /// Product category.
    ProductCategory,
    /// Incoming supply.
    Supply,
    /// Business expense.
    Expense,
    /// Retail order.
    Order,
    /// Treatment session.
    Treatment,
    /// Consultant session.
    Consultant,
    /// Debt incurred by a customer.
    DebtIncurrence,
    /// Debt payment made by a customer.
    DebtPayment,
}

impl NotificationResource {
    /// Human-readable singular noun used in notification content.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Customer => "customer",
            Self::Brand => "brand",
            Self::Product => "product",
            Self::ProductCategory => "product category",
            Self::Supply => "supply",
            Self::Expense => "expense",
            Self::Order => "order",
            Self::Treatment => "treatment",
            Self::Consultant => "consultant",
            Self::DebtIncurrence => "debt incurrence",
            Self::DebtPayment => "debt payment",
        }
    }
}

/// What happened to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationAction {
    /// The resource was created.
    Creation,
    /// The resource was modified.
    Modification,
    /// The resource was deleted.
    Deletion,
    /// The person behind the resource has a birthday today.
    Birthday,
    /// A user's joining date anniversary is today.
    JoiningDateAnniversary,
}

macro_rules! notification_types {
    ($($variant:ident => ($resource:ident, $action:ident, $name:literal)),+ $(,)?) => {
        /// Kind of domain event a notification records.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[sqlx(type_name = "notification_type", rename_all = "snake_case")]
        pub enum NotificationType {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl NotificationType {
            /// Every notification type, in declaration order.
            pub const ALL: &'static [NotificationType] = &[$(Self::$variant),+];

            /// The resource this type of event concerns.
            pub fn resource(&self) -> NotificationResource {
                match self {
                    $(Self::$variant => NotificationResource::$resource,)+
                }
            }

            /// The action this type of event records.
            pub fn action(&self) -> NotificationAction {
                match self {
                    $(Self::$variant => NotificationAction::$action,)+
                }
            }

            /// Return the type as its snake_case storage name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for NotificationType {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name | stringify!($variant) => Ok(Self::$variant),)+
                    _ => Err(AppError::validation(format!(
                        "Invalid notification type: '{s}'"
                    ))),
                }
            }
        }
    };
}

notification_types! {
    UserCreation => (User, Creation, "user_creation"),
    UserModification => (User, Modification, "user_modification"),
    UserDeletion => (User, Deletion, "user_deletion"),
    UserBirthday => (User, Birthday, "user_birthday"),
    UserJoiningDateAnniversary => (User, JoiningDateAnniversary, "user_joining_date_anniversary"),
    CustomerCreation => (Customer, Creation, "customer_creation"),
    CustomerModification => (Customer, Modification, "customer_modification"),
    CustomerDeletion => (Customer, Deletion, "customer_deletion"),
    CustomerBirthday => (Customer, Birthday, "customer_birthday"),
    BrandCreation => (Brand, Creation, "brand_creation"),
    BrandModification => (Brand, Modification, "brand_modification"),
    BrandDeletion => (Brand, Deletion, "brand_deletion"),
    ProductCreation => (Product, Creation, "product_creation"),
    ProductModification => (Product, Modification, "product_modification"),
    ProductDeletion => (Product, Deletion, "product_deletion"),
    ProductCategoryCreation => (ProductCategory, Creation, "product_category_creation"),
    ProductCategoryModification => (ProductCategory, Modification, "product_category_modification"),
    ProductCategoryDeletion => (ProductCategory, Deletion, "product_category_deletion"),
    SupplyCreation => (Supply, Creation, "supply_creation"),
    SupplyModification => (Supply, Modification, "supply_modification"),
    SupplyDeletion => (Supply, Deletion, "supply_deletion"),
    ExpenseCreation => (Expense, Creation, "expense_creation"),
    ExpenseModification => (Expense, Modification, "expense_modification"),
    ExpenseDeletion => (Expense, Deletion, "expense_deletion"),
    OrderCreation => (Order, Creation, "order_creation"),
    OrderModification => (Order, Modification, "order_modification"),
    OrderDeletion => (Order, Deletion, "order_deletion"),
    TreatmentCreation => (Treatment, Creation, "treatment_creation"),
    TreatmentModification => (Treatment, Modification, "treatment_modification"),
    TreatmentDeletion => (Treatment, Deletion, "treatment_deletion"),
    ConsultantCreation => (Consultant, Creation, "consultant_creation"),
    ConsultantModification => (Consultant, Modification, "consultant_modification"),
    ConsultantDeletion => (Consultant, Deletion, "consultant_deletion"),
    DebtIncurrenceCreation => (DebtIncurrence, Creation, "debt_incurrence_creation"),
    DebtIncurrenceModification => (DebtIncurrence, Modification, "debt_incurrence_modification"),
    DebtIncurrenceDeletion => (DebtIncurrence, Deletion, "debt_incurrence_deletion"),
    DebtPaymentCreation => (DebtPayment, Creation, "debt_payment_creation"),
    DebtPaymentModification => (DebtPayment, Modification, "debt_payment_modification"),
    DebtPaymentDeletion => (DebtPayment, Deletion, "debt_payment_deletion"),
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
