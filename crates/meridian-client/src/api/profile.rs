//! Profile facade: the logged-in user's own record.

use serde_json::{json, Value};

use meridian_core::validation::require_secret;
use meridian_core::{CallArgs, ContextOverrides, Endpoint, FileAttachment, FormData};

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Form field the profile image is uploaded under.
pub const PROFILE_IMAGE_FIELD: &str = "ProfileImage";

pub struct ProfileApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> ProfileApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        ProfileApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    fn args(&self) -> CallArgs {
        CallArgs::new().context(self.context.clone())
    }

    pub async fn get(&self) -> ClientResult<Value> {
        self.client.execute(Endpoint::GetProfile, self.args()).await
    }

    pub async fn update(&self, profile: Value) -> ClientResult<Value> {
        self.client
            .execute(Endpoint::UpdateProfile, self.args().json(profile))
            .await
    }

    pub async fn update_image(&self, image: FileAttachment) -> ClientResult<Value> {
        let form = FormData::new().file(PROFILE_IMAGE_FIELD, image);
        self.client
            .execute(Endpoint::UpdateProfileImage, self.args().form(form))
            .await
    }

    /// Both passwords are sent exactly as typed.
    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<Value> {
        require_secret("currentPassword", current)?;
        require_secret("newPassword", new)?;
        let body = json!({
            "OldPassword": current,
            "NewPassword": new,
        });
        self.client
            .execute(Endpoint::ChangePassword, self.args().json(body))
            .await
    }
}
