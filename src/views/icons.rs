//! Icon assets, relative to the host's asset root.

pub const PERSON: &str = "assets/person.png";
pub const COMPANY: &str = "assets/company.png";
pub const EMAIL_IN_ODOO: &str = "assets/email_in_odoo.png";
pub const EMAIL_LOGGED: &str = "assets/email_logged.png";
pub const EMPTY_FOLDER: &str = "assets/empty_folder.png";
pub const WARNING: &str = "assets/warning.png";
