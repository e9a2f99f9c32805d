//! Tenant contracts
//!
//! The create contract checks the payload; updates are applied to a copy of
//! the stored tenant and the result is validated as a whole, so a partial
//! update cannot leave the lease ending before it starts.

use chrono::NaiveDate;
use pm_core::error::ValidationErrors;
use pm_models::{CreateTenantDto, Tenant};

use crate::base::{check_attributes, validate_present, Contract, ValidationResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct TenantContract;

impl TenantContract {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_lease(&self, start: NaiveDate, end: NaiveDate, errors: &mut ValidationErrors) {
        if end < start {
            errors.add("lease_end", "must be on or after the lease start");
        }
    }

    pub fn validate_payment_due(&self, day: i32, errors: &mut ValidationErrors) {
        if !(1..=31).contains(&day) && !errors.has_error("payment_due") {
            errors.add("payment_due", "must be a day of the month");
        }
    }

    pub fn validate_amounts(&self, rent: f64, deposit: f64, errors: &mut ValidationErrors) {
        if !(rent >= 0.0) && !errors.has_error("rent_amount") {
            errors.add("rent_amount", "must be greater than or equal to 0");
        }
        if !(deposit >= 0.0) && !errors.has_error("deposit_amount") {
            errors.add("deposit_amount", "must be greater than or equal to 0");
        }
    }
}

impl Contract<CreateTenantDto> for TenantContract {
    fn validate(&self, dto: &CreateTenantDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        check_attributes(dto, &mut errors);
        validate_present("first_name", &dto.first_name, &mut errors);
        validate_present("last_name", &dto.last_name, &mut errors);
        self.validate_lease(dto.lease_start, dto.lease_end, &mut errors);
        self.validate_payment_due(dto.payment_due, &mut errors);
        self.validate_amounts(dto.rent_amount, dto.deposit_amount, &mut errors);

        errors.into_result()
    }
}

impl Contract<Tenant> for TenantContract {
    fn validate(&self, tenant: &Tenant) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_present("first_name", &tenant.first_name, &mut errors);
        validate_present("last_name", &tenant.last_name, &mut errors);
        validate_present("email", &tenant.email, &mut errors);
        self.validate_lease(tenant.lease_start, tenant.lease_end, &mut errors);
        self.validate_payment_due(tenant.payment_due, &mut errors);
        self.validate_amounts(tenant.rent_amount, tenant.deposit_amount, &mut errors);

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pm_models::{TenantStatus, UpdateTenantDto};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_dto() -> CreateTenantDto {
        CreateTenantDto {
            unit_id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            emergency_contact: None,
            lease_start: date(2024, 1, 1),
            lease_end: date(2024, 12, 31),
            rent_amount: 1200.0,
            deposit_amount: 1200.0,
            payment_due: 1,
            status: TenantStatus::Active,
        }
    }

    fn tenant() -> Tenant {
        let now = Utc::now();
        let dto = create_dto();
        Tenant {
            id: Uuid::new_v4(),
            unit_id: dto.unit_id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone: dto.phone,
            emergency_contact: None,
            lease_start: dto.lease_start,
            lease_end: dto.lease_end,
            rent_amount: dto.rent_amount,
            deposit_amount: dto.deposit_amount,
            payment_due: dto.payment_due,
            status: dto.status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_tenant() {
        assert!(TenantContract::new().validate(&create_dto()).is_ok());
    }

    #[test]
    fn test_lease_end_before_start() {
        let mut dto = create_dto();
        dto.lease_end = date(2023, 12, 31);
        let errors = TenantContract::new().validate(&dto).unwrap_err();
        assert!(errors.has_error("lease_end"));
    }

    #[test]
    fn test_single_day_lease_is_valid() {
        let mut dto = create_dto();
        dto.lease_end = dto.lease_start;
        assert!(TenantContract::new().validate(&dto).is_ok());
    }

    #[test]
    fn test_negative_rent_reported_once() {
        let mut dto = create_dto();
        dto.rent_amount = -5.0;
        let errors = TenantContract::new().validate(&dto).unwrap_err();
        assert_eq!(errors.get("rent_amount").map(Vec::len), Some(1));
    }

    #[test]
    fn test_partial_update_cannot_invert_lease() {
        let mut t = tenant();
        let update = UpdateTenantDto {
            lease_start: Some(date(2025, 6, 1)),
            ..Default::default()
        };
        update.apply_to(&mut t);
        let errors = TenantContract::new().validate(&t).unwrap_err();
        assert!(errors.has_error("lease_end"));
    }
}
