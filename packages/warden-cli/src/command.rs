pub mod exec;
pub mod grant;
pub mod grants;
pub mod overview;
pub mod revoke;

use anyhow::{bail, Result};
use warden::prelude::*;

/// What a transaction command reports once it settles
#[derive(Debug)]
pub enum TxLog {
    Landed { record: TxRecord },
    Failed { record: TxRecord },
}

// takes the settled record out of the store
pub(crate) fn settled(controller: &AuthzController, request_id: RequestId) -> Result<TxLog> {
    let record = controller.request(request_id);
    controller.forget_request(request_id);

    match record {
        Some(record) if record.status == TxStatus::Rejected => Ok(TxLog::Failed { record }),
        Some(record) => Ok(TxLog::Landed { record }),
        None => bail!("request {request_id} was never recorded"),
    }
}
