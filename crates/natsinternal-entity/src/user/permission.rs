//! Permissions relevant to notification recipient resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use natsinternal_core::AppError;

use crate::notification::NotificationResource;

/// Read permission over one resource type. Holders are notified about
/// events on that resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    GetUserDetail,
    GetCustomerDetail,
    GetBrandDetail,
    GetProductDetail,
    GetProductCategoryDetail,
    GetSupplyDetail,
    GetExpenseDetail,
    GetOrderDetail,
    GetTreatmentDetail,
    GetConsultantDetail,
    GetDebtIncurrenceDetail,
    GetDebtPaymentDetail,
}

impl Permission {
    /// The permission needed to view a resource type.
    pub fn to_view(resource: NotificationResource) -> Self {
        match resource {
            NotificationResource::User => Self::GetUserDetail,
            NotificationResource::Customer => Self::GetCustomerDetail,
            NotificationResource::Brand => Self::GetBrandDetail,
            NotificationResource::Product => Self::GetProductDetail,
            NotificationResource::ProductCategory => Self::GetProductCategoryDetail,
            NotificationResource::Supply => Self::GetSupplyDetail,
            NotificationResource::Expense => Self::GetExpenseDetail,
            NotificationResource::Order => Self::GetOrderDetail,
            NotificationResource::Treatment => Self::GetTreatmentDetail,
            NotificationResource::Consultant => Self::GetConsultantDetail,
            NotificationResource::DebtIncurrence => Self::GetDebtIncurrenceDetail,
            NotificationResource::DebtPayment => Self::GetDebtPaymentDetail,
        }
    }

    /// Return the permission name as stored in `role_permissions`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetUserDetail => "GetUserDetail",
            Self::GetCustomerDetail => "GetCustomerDetail",
            Self::GetBrandDetail => "GetBrandDetail",
            Self::GetProductDetail => "GetProductDetail",
            Self::GetProductCategoryDetail => "GetProductCategoryDetail",
            Self::GetSupplyDetail => "GetSupplyDetail",
            Self::GetExpenseDetail => "GetExpenseDetail",
            Self::GetOrderDetail => "GetOrderDetail",
            Self::GetTreatmentDetail => "GetTreatmentDetail",
            Self::GetConsultantDetail => "GetConsultantDetail",
            Self::GetDebtIncurrenceDetail => "GetDebtIncurrenceDetail",
            Self::GetDebtPaymentDetail => "GetDebtPaymentDetail",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| AppError::validation(format!("Invalid permission: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_storage_name() {
        let permission = Permission::to_view(NotificationResource::DebtPayment);
        assert_eq!(permission, Permission::GetDebtPaymentDetail);
        assert_eq!(
            permission.as_str().parse::<Permission>().unwrap(),
            permission
        );
        assert!("DropDatabase".parse::<Permission>().is_err());
    }
}
