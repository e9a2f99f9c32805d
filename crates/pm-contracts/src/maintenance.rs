//! Maintenance request contracts

use pm_core::error::ValidationErrors;
use pm_models::{CreateMaintenanceRequestDto, UpdateMaintenanceRequestDto};

use crate::base::{check_attributes, validate_present, Contract, ValidationResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct MaintenanceContract;

impl Contract<CreateMaintenanceRequestDto> for MaintenanceContract {
    fn validate(&self, dto: &CreateMaintenanceRequestDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        check_attributes(dto, &mut errors);
        validate_present("title", &dto.title, &mut errors);
        validate_present("description", &dto.description, &mut errors);
        errors.into_result()
    }
}

impl Contract<UpdateMaintenanceRequestDto> for MaintenanceContract {
    fn validate(&self, dto: &UpdateMaintenanceRequestDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        check_attributes(dto, &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_models::{MaintenanceCategory, MaintenancePriority, MaintenanceStatus};
    use uuid::Uuid;

    fn dto(title: &str) -> CreateMaintenanceRequestDto {
        CreateMaintenanceRequestDto {
            property_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            title: title.into(),
            description: "Water under the sink".into(),
            priority: MaintenancePriority::High,
            category: MaintenanceCategory::Plumbing,
            status: MaintenanceStatus::Open,
            assigned_to: None,
            cost: None,
            images: vec![],
        }
    }

    #[test]
    fn test_title_required() {
        assert!(MaintenanceContract.validate(&dto("Leak")).is_ok());
        let errors = MaintenanceContract.validate(&dto("  ")).unwrap_err();
        assert!(errors.has_error("title"));
    }

    #[test]
    fn test_negative_cost_on_update() {
        let update = UpdateMaintenanceRequestDto {
            cost: Some(-1.0),
            ..Default::default()
        };
        assert!(MaintenanceContract.validate(&update).unwrap_err().has_error("cost"));
    }
}
