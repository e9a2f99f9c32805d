//! Payment contracts

use pm_core::error::ValidationErrors;
use pm_models::CreatePaymentDto;

use crate::base::{check_attributes, Contract, ValidationResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct PaymentContract;

impl Contract<CreatePaymentDto> for PaymentContract {
    fn validate(&self, dto: &CreatePaymentDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        check_attributes(dto, &mut errors);
        if dto.amount == 0.0 || !dto.amount.is_finite() {
            errors.add("amount", "must be greater than 0");
        }
        errors.into_result()
    }
}
