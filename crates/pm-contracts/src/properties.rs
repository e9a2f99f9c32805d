//! Property contracts

use pm_core::error::ValidationErrors;
use pm_models::{CreatePropertyDto, UpdatePropertyDto};

use crate::base::{check_attributes, validate_present, Contract, ValidationResult};

/// Maximum number of image URLs attached to a property
pub const MAX_IMAGES: usize = 10;

#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyContract;

impl PropertyContract {
    pub fn new() -> Self {
        Self
    }

    fn validate_images(&self, images: Option<&Vec<String>>, errors: &mut ValidationErrors) {
        if let Some(images) = images {
            if images.len() > MAX_IMAGES {
                errors.add(
                    "images",
                    format!("is too long (maximum is {} images)", MAX_IMAGES),
                );
            }
        }
    }
}

impl Contract<CreatePropertyDto> for PropertyContract {
    fn validate(&self, dto: &CreatePropertyDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        check_attributes(dto, &mut errors);
        validate_present("name", &dto.name, &mut errors);
        validate_present("address", &dto.address, &mut errors);
        self.validate_images(dto.images.as_ref(), &mut errors);

        errors.into_result()
    }
}

impl Contract<UpdatePropertyDto> for PropertyContract {
    fn validate(&self, dto: &UpdatePropertyDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        check_attributes(dto, &mut errors);
        if let Some(ref name) = dto.name {
            validate_present("name", name, &mut errors);
        }
        if let Some(ref address) = dto.address {
            validate_present("address", address, &mut errors);
        }
        self.validate_images(dto.images.as_ref(), &mut errors);

        errors.into_result()
    }
}
