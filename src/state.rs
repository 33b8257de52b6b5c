use std::sync::Arc;

use common::{
    convert::IFormatConverter,
    dispatch::DispatchService,
    error::RelayResult,
    persistence::IUploadRelay,
    util::state::{RelayServiceCollection, RelaySettings},
};

pub type Services = Arc<ServiceCollection>;

pub struct ServiceCollection {
    pub dispatch_service: DispatchService,
}

impl ServiceCollection {
    pub fn build(settings: RelaySettings) -> RelayResult<Services> {
        let base = RelayServiceCollection::build(settings)?;
        Ok(Self::from_parts(base.format_converter.clone(), base.upload_relay.clone()))
    }

    pub fn from_parts(format_converter: Arc<dyn IFormatConverter>, upload_relay: Arc<dyn IUploadRelay>) -> Services {
        Arc::new(ServiceCollection {
            dispatch_service: DispatchService {
                format_converter,
                upload_relay,
            },
        })
    }
}
