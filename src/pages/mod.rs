mod layout;
mod location_form;
mod locations;
mod login;

pub use layout::RootAuthed;
pub use location_form::{LocationCreatePage, LocationEditPage};
pub use locations::LocationsPage;
pub use login::LoginPage;

pub(crate) const LOGIN_PATH: &str = "/authentication/login";
pub(crate) const LOCATIONS_PATH: &str = "/location";
pub(crate) const CREATE_LOCATION_PATH: &str = "/pages/location/create";

pub(crate) fn edit_location_path(id: &str) -> String {
    format!("/pages/location/edit/{}", urlencoding::encode(id))
}
