//! Unit contracts

use pm_core::error::ValidationErrors;
use pm_models::CreateUnitDto;

use crate::base::{check_attributes, validate_present, Contract, ValidationResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnitContract;

impl Contract<CreateUnitDto> for UnitContract {
    fn validate(&self, dto: &CreateUnitDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        check_attributes(dto, &mut errors);
        validate_present("unit_number", &dto.unit_number, &mut errors);
        errors.into_result()
    }
}
