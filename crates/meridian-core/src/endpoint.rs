//! # Endpoint Descriptor Table
//!
//! One declarative entry per backend operation. The client's dispatcher reads
//! these descriptors instead of every call site hand-building its request.
//!
//! ## Descriptor Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EndpointSpec for Document(PurchaseOrder, DeleteLine)                   │
//! │                                                                         │
//! │  key         PURCHASE_ORDER_DELETE_LINE  ← path override name          │
//! │  method      DELETE                                                     │
//! │  path        /api/PurchaseOrder/DeleteLine                              │
//! │  context     CMP | ENV | USER, Upper     → CMPUUID, ENVUUID, UserUUID  │
//! │  target      lineUuid                    → uuid, UUID, LineUUID        │
//! │  pagination  none                                                       │
//! │  body        none                                                       │
//! │  response    Envelope                    → Data / data / raw            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why aliases?
//! The backend is unversioned and inconsistently cased: the same identifier is
//! read as `uuid` by one controller and `LineUUID` by the next. Every alias in
//! an [`IdParam`] is sent, so whichever one the controller binds is present.

use std::borrow::Cow;
use std::collections::HashMap;

use bitflags::bitflags;

use crate::request::HttpMethod;

// =============================================================================
// Context Parameters
// =============================================================================

bitflags! {
    /// Which tenant-context identifiers an endpoint needs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Requires: u8 {
        const CMP = 0b001;
        const ENV = 0b010;
        const USER = 0b100;
        const TENANT = Self::CMP.bits() | Self::ENV.bits();
        const ALL = Self::CMP.bits() | Self::ENV.bits() | Self::USER.bits();
    }
}

/// Query key naming convention for the context identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCasing {
    /// `cmpuuid`, `envuuid`, `useruuid`
    Lower,
    /// `CMPUUID`, `ENVUUID`, `UserUUID`
    Upper,
    /// Both of the above.
    Both,
}

impl KeyCasing {
    pub fn cmp_keys(&self) -> &'static [&'static str] {
        match self {
            KeyCasing::Lower => &["cmpuuid"],
            KeyCasing::Upper => &["CMPUUID"],
            KeyCasing::Both => &["cmpuuid", "CMPUUID"],
        }
    }

    pub fn env_keys(&self) -> &'static [&'static str] {
        match self {
            KeyCasing::Lower => &["envuuid"],
            KeyCasing::Upper => &["ENVUUID"],
            KeyCasing::Both => &["envuuid", "ENVUUID"],
        }
    }

    pub fn user_keys(&self) -> &'static [&'static str] {
        match self {
            KeyCasing::Lower => &["useruuid"],
            KeyCasing::Upper => &["UserUUID"],
            KeyCasing::Both => &["useruuid", "UserUUID"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextParams {
    pub requires: Requires,
    pub casing: KeyCasing,
}

impl ContextParams {
    pub const NONE: ContextParams = ContextParams {
        requires: Requires::empty(),
        casing: KeyCasing::Upper,
    };
}

// =============================================================================
// Identifier Parameters
// =============================================================================

/// A caller-supplied record identifier and every query key it is sent under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam {
    /// Caller-facing name, used in "<field> is required".
    pub field: &'static str,
    pub aliases: &'static [&'static str],
}

pub const HEADER_ID: IdParam = IdParam {
    field: "headerUuid",
    aliases: &["uuid", "UUID", "HeaderUUID"],
};

pub const LINE_ID: IdParam = IdParam {
    field: "lineUuid",
    aliases: &["uuid", "UUID", "LineUUID"],
};

/// Owning header when listing or adding lines.
pub const PARENT_HEADER_ID: IdParam = IdParam {
    field: "headerUuid",
    aliases: &["HeaderUUID", "headerUuid"],
};

pub const LEAVE_ID: IdParam = IdParam {
    field: "leaveUuid",
    aliases: &["uuid", "UUID", "LeaveUUID"],
};

pub const LEAD_ID: IdParam = IdParam {
    field: "leadUuid",
    aliases: &["uuid", "UUID", "LeadUUID"],
};

/// The status controller only binds lowercase `uuid`.
pub const LEAD_STATUS_ID: IdParam = IdParam {
    field: "leadUuid",
    aliases: &["uuid"],
};

pub const PARENT_LEAD_ID: IdParam = IdParam {
    field: "leadUuid",
    aliases: &["LeadUUID", "leaduuid"],
};

// =============================================================================
// Pagination / Body / Response
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    None,
    /// `start`, `length`, `searchValue`
    Lower,
    /// Lower plus `Start`, `Length`, `SearchValue`
    Both,
}

impl PaginationStyle {
    /// (start, length, search) key triples to emit.
    pub fn key_sets(&self) -> &'static [(&'static str, &'static str, &'static str)] {
        match self {
            PaginationStyle::None => &[],
            PaginationStyle::Lower => &[("start", "length", "searchValue")],
            PaginationStyle::Both => &[
                ("start", "length", "searchValue"),
                ("Start", "Length", "SearchValue"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    None,
    Json,
    Multipart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `Data`, else `data`, else the raw body.
    Envelope,
    /// Body untouched.
    Raw,
    /// Base64 document located by key scan; errors become user-facing.
    Document,
}

// =============================================================================
// Endpoint Spec
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Stable override name, e.g. `SALES_ORDER_LIST`.
    pub key: Cow<'static, str>,
    pub method: HttpMethod,
    pub default_path: Cow<'static, str>,
    pub context: ContextParams,
    pub target: Option<IdParam>,
    pub parent: Option<IdParam>,
    pub pagination: PaginationStyle,
    pub body: BodyEncoding,
    pub response: ResponseKind,
    /// Sends the bearer token.
    pub authenticated: bool,
    /// Attaches the device IP for audit trails.
    pub audit_ip: bool,
    /// Display name used in user-facing messages.
    pub entity: Cow<'static, str>,
}

impl EndpointSpec {
    fn new(
        key: impl Into<Cow<'static, str>>,
        method: HttpMethod,
        path: impl Into<Cow<'static, str>>,
        entity: impl Into<Cow<'static, str>>,
    ) -> Self {
        EndpointSpec {
            key: key.into(),
            method,
            default_path: path.into(),
            context: ContextParams::NONE,
            target: None,
            parent: None,
            pagination: PaginationStyle::None,
            body: match method {
                HttpMethod::Post | HttpMethod::Put => BodyEncoding::Json,
                HttpMethod::Get | HttpMethod::Delete => BodyEncoding::None,
            },
            response: ResponseKind::Envelope,
            authenticated: true,
            audit_ip: false,
            entity: entity.into(),
        }
    }

    fn get(
        key: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
        entity: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(key, HttpMethod::Get, path, entity)
    }

    fn post(
        key: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
        entity: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(key, HttpMethod::Post, path, entity)
    }

    fn delete(
        key: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
        entity: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(key, HttpMethod::Delete, path, entity)
    }

    fn context(mut self, requires: Requires, casing: KeyCasing) -> Self {
        self.context = ContextParams { requires, casing };
        self
    }

    fn target(mut self, id: IdParam) -> Self {
        self.target = Some(id);
        self
    }

    fn parent(mut self, id: IdParam) -> Self {
        self.parent = Some(id);
        self
    }

    fn paginated(mut self, style: PaginationStyle) -> Self {
        self.pagination = style;
        self
    }

    fn multipart(mut self) -> Self {
        self.body = BodyEncoding::Multipart;
        self
    }

    fn document(mut self) -> Self {
        self.response = ResponseKind::Document;
        self
    }

    fn public(mut self) -> Self {
        self.authenticated = false;
        self
    }

    fn audited(mut self) -> Self {
        self.audit_ip = true;
        self
    }
}

// =============================================================================
// Header/Line Documents
// =============================================================================

/// ERP documents that share the header/line shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    SalesOrder,
    SalesInvoice,
    PurchaseOrder,
    PurchaseInvoice,
    Timesheet,
    Expense,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::SalesOrder,
        DocumentKind::SalesInvoice,
        DocumentKind::PurchaseOrder,
        DocumentKind::PurchaseInvoice,
        DocumentKind::Timesheet,
        DocumentKind::Expense,
    ];

    fn key_prefix(&self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "SALES_ORDER",
            DocumentKind::SalesInvoice => "SALES_INVOICE",
            DocumentKind::PurchaseOrder => "PURCHASE_ORDER",
            DocumentKind::PurchaseInvoice => "PURCHASE_INVOICE",
            DocumentKind::Timesheet => "TIMESHEET",
            DocumentKind::Expense => "EXPENSE",
        }
    }

    fn controller(&self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "SalesOrder",
            DocumentKind::SalesInvoice => "SalesInvoice",
            DocumentKind::PurchaseOrder => "PurchaseOrder",
            DocumentKind::PurchaseInvoice => "PurchaseInvoice",
            DocumentKind::Timesheet => "Timesheet",
            DocumentKind::Expense => "Expense",
        }
    }

    /// Display name, e.g. "Sales order".
    pub fn entity(&self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "Sales order",
            DocumentKind::SalesInvoice => "Sales invoice",
            DocumentKind::PurchaseOrder => "Purchase order",
            DocumentKind::PurchaseInvoice => "Purchase invoice",
            DocumentKind::Timesheet => "Timesheet",
            DocumentKind::Expense => "Expense",
        }
    }

    /// Sales and purchase controllers read upper-case keys; the employee
    /// self-service controllers accept either casing and get both.
    fn casing(&self) -> KeyCasing {
        match self {
            DocumentKind::Timesheet | DocumentKind::Expense => KeyCasing::Both,
            _ => KeyCasing::Upper,
        }
    }

    /// Expense lines carry receipt images.
    fn lines_are_multipart(&self) -> bool {
        matches!(self, DocumentKind::Expense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentOp {
    List,
    Header,
    AddHeader,
    UpdateHeader,
    DeleteHeader,
    Lines,
    AddLine,
    UpdateLine,
    DeleteLine,
    Submit,
    Pdf,
}

impl DocumentOp {
    pub const ALL: [DocumentOp; 11] = [
        DocumentOp::List,
        DocumentOp::Header,
        DocumentOp::AddHeader,
        DocumentOp::UpdateHeader,
        DocumentOp::DeleteHeader,
        DocumentOp::Lines,
        DocumentOp::AddLine,
        DocumentOp::UpdateLine,
        DocumentOp::DeleteLine,
        DocumentOp::Submit,
        DocumentOp::Pdf,
    ];

    fn key_suffix(&self) -> &'static str {
        match self {
            DocumentOp::List => "LIST",
            DocumentOp::Header => "HEADER",
            DocumentOp::AddHeader => "ADD_HEADER",
            DocumentOp::UpdateHeader => "UPDATE_HEADER",
            DocumentOp::DeleteHeader => "DELETE_HEADER",
            DocumentOp::Lines => "LINES",
            DocumentOp::AddLine => "ADD_LINE",
            DocumentOp::UpdateLine => "UPDATE_LINE",
            DocumentOp::DeleteLine => "DELETE_LINE",
            DocumentOp::Submit => "SUBMIT",
            DocumentOp::Pdf => "PDF",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            DocumentOp::List => "GetList",
            DocumentOp::Header => "GetHeader",
            DocumentOp::AddHeader => "AddHeader",
            DocumentOp::UpdateHeader => "UpdateHeader",
            DocumentOp::DeleteHeader => "DeleteHeader",
            DocumentOp::Lines => "GetLines",
            DocumentOp::AddLine => "AddLine",
            DocumentOp::UpdateLine => "UpdateLine",
            DocumentOp::DeleteLine => "DeleteLine",
            DocumentOp::Submit => "Submit",
            DocumentOp::Pdf => "GetPdf",
        }
    }
}

fn document_spec(kind: DocumentKind, op: DocumentOp) -> EndpointSpec {
    let key = format!("{}_{}", kind.key_prefix(), op.key_suffix());
    let path = format!("/api/{}/{}", kind.controller(), op.action());
    let entity = kind.entity();
    let casing = kind.casing();

    let spec = match op {
        DocumentOp::List => EndpointSpec::get(key, path, entity).paginated(PaginationStyle::Both),
        DocumentOp::Header => EndpointSpec::get(key, path, entity).target(HEADER_ID),
        DocumentOp::AddHeader => EndpointSpec::post(key, path, entity).audited(),
        DocumentOp::UpdateHeader => EndpointSpec::post(key, path, entity)
            .target(HEADER_ID)
            .audited(),
        DocumentOp::DeleteHeader => EndpointSpec::delete(key, path, entity).target(HEADER_ID),
        DocumentOp::Lines => EndpointSpec::get(key, path, entity).parent(PARENT_HEADER_ID),
        DocumentOp::AddLine => EndpointSpec::post(key, path, entity).parent(PARENT_HEADER_ID),
        DocumentOp::UpdateLine => EndpointSpec::post(key, path, entity).target(LINE_ID),
        DocumentOp::DeleteLine => EndpointSpec::delete(key, path, entity).target(LINE_ID),
        DocumentOp::Submit => EndpointSpec::post(key, path, entity)
            .target(HEADER_ID)
            .audited(),
        DocumentOp::Pdf => EndpointSpec::get(key, path, entity)
            .target(HEADER_ID)
            .document(),
    };

    let spec = match op {
        DocumentOp::AddLine | DocumentOp::UpdateLine if kind.lines_are_multipart() => {
            spec.multipart()
        }
        _ => spec,
    };

    spec.context(Requires::ALL, casing)
}

// =============================================================================
// Endpoint
// =============================================================================

/// Every backend operation this layer can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Auth
    Login,
    RefreshToken,
    KspAuth,
    RegisterDeviceToken,
    RemoveDeviceToken,

    // Profile
    GetProfile,
    UpdateProfile,
    UpdateProfileImage,
    ChangePassword,

    // Company setup
    CompanyList,
    EnvironmentList,
    CompanyDetails,
    DepartmentList,
    DesignationList,
    EmployeeList,
    CustomerList,
    VendorList,
    ItemList,
    CurrencyList,
    TaxList,
    PaymentTermList,
    ProjectList,

    // HR / attendance
    CheckIn,
    CheckOut,
    AttendanceHistory,
    AttendanceSummary,
    HolidayList,
    LeaveTypes,
    LeaveBalance,
    ApplyLeave,
    LeaveList,
    CancelLeave,
    ApproveLeaveList,
    ApproveLeave,
    RejectLeave,
    PayslipPdf,

    // Timesheet lookups
    ProjectTasks,

    // Expense lookups
    ExpenseCategories,

    // Header/line documents (sales, purchase, timesheet, expense)
    Document(DocumentKind, DocumentOp),

    // Business development
    LeadList,
    LeadDetails,
    AddLead,
    UpdateLead,
    UpdateLeadStatus,
    DeleteLead,
    LeadSources,
    LeadStatuses,
    LeadFollowUps,
    AddLeadFollowUp,
    LeadProposals,
    AddLeadProposal,
}

const FIXED_ENDPOINTS: [Endpoint; 50] = [
    Endpoint::Login,
    Endpoint::RefreshToken,
    Endpoint::KspAuth,
    Endpoint::RegisterDeviceToken,
    Endpoint::RemoveDeviceToken,
    Endpoint::GetProfile,
    Endpoint::UpdateProfile,
    Endpoint::UpdateProfileImage,
    Endpoint::ChangePassword,
    Endpoint::CompanyList,
    Endpoint::EnvironmentList,
    Endpoint::CompanyDetails,
    Endpoint::DepartmentList,
    Endpoint::DesignationList,
    Endpoint::EmployeeList,
    Endpoint::CustomerList,
    Endpoint::VendorList,
    Endpoint::ItemList,
    Endpoint::CurrencyList,
    Endpoint::TaxList,
    Endpoint::PaymentTermList,
    Endpoint::ProjectList,
    Endpoint::CheckIn,
    Endpoint::CheckOut,
    Endpoint::AttendanceHistory,
    Endpoint::AttendanceSummary,
    Endpoint::HolidayList,
    Endpoint::LeaveTypes,
    Endpoint::LeaveBalance,
    Endpoint::ApplyLeave,
    Endpoint::LeaveList,
    Endpoint::CancelLeave,
    Endpoint::ApproveLeaveList,
    Endpoint::ApproveLeave,
    Endpoint::RejectLeave,
    Endpoint::PayslipPdf,
    Endpoint::ProjectTasks,
    Endpoint::ExpenseCategories,
    Endpoint::LeadList,
    Endpoint::LeadDetails,
    Endpoint::AddLead,
    Endpoint::UpdateLead,
    Endpoint::UpdateLeadStatus,
    Endpoint::DeleteLead,
    Endpoint::LeadSources,
    Endpoint::LeadStatuses,
    Endpoint::LeadFollowUps,
    Endpoint::AddLeadFollowUp,
    Endpoint::LeadProposals,
    Endpoint::AddLeadProposal,
];

impl Endpoint {
    /// Every endpoint, document combinations included.
    pub fn all() -> Vec<Endpoint> {
        let mut all = FIXED_ENDPOINTS.to_vec();
        for kind in DocumentKind::ALL {
            for op in DocumentOp::ALL {
                all.push(Endpoint::Document(kind, op));
            }
        }
        all
    }

    /// Finds an endpoint by its override key.
    pub fn from_key(key: &str) -> Option<Endpoint> {
        Endpoint::all().into_iter().find(|e| e.spec().key == key)
    }

    /// The descriptor for this endpoint.
    pub fn spec(&self) -> EndpointSpec {
        use KeyCasing::{Both, Lower, Upper};
        use PaginationStyle as Page;

        match *self {
            // -----------------------------------------------------------------
            // Auth
            // -----------------------------------------------------------------
            Endpoint::Login => EndpointSpec::post("LOGIN", "/api/Auth/Login", "Login").public(),
            Endpoint::RefreshToken => {
                EndpointSpec::post("REFRESH_TOKEN", "/api/Auth/RefreshToken", "Session").public()
            }
            Endpoint::KspAuth => EndpointSpec::post("KSP_AUTH", "/api/Auth/KSPAuth", "Login").public(),
            Endpoint::RegisterDeviceToken => EndpointSpec::post(
                "REGISTER_DEVICE_TOKEN",
                "/api/Notification/RegisterDeviceToken",
                "Device token",
            )
            .context(Requires::USER, Upper),
            Endpoint::RemoveDeviceToken => EndpointSpec::post(
                "REMOVE_DEVICE_TOKEN",
                "/api/Notification/RemoveDeviceToken",
                "Device token",
            )
            .context(Requires::USER, Upper),

            // -----------------------------------------------------------------
            // Profile
            // -----------------------------------------------------------------
            Endpoint::GetProfile => EndpointSpec::get("GET_PROFILE", "/api/User/GetProfile", "Profile")
                .context(Requires::USER, Upper),
            Endpoint::UpdateProfile => {
                EndpointSpec::post("UPDATE_PROFILE", "/api/User/UpdateProfile", "Profile")
                    .context(Requires::ALL, Upper)
            }
            Endpoint::UpdateProfileImage => EndpointSpec::post(
                "UPDATE_PROFILE_IMAGE",
                "/api/User/UpdateProfileImage",
                "Profile image",
            )
            .context(Requires::USER, Upper)
            .multipart(),
            Endpoint::ChangePassword => {
                EndpointSpec::post("CHANGE_PASSWORD", "/api/User/ChangePassword", "Password")
                    .context(Requires::USER, Upper)
            }

            // -----------------------------------------------------------------
            // Company setup
            // -----------------------------------------------------------------
            Endpoint::CompanyList => {
                EndpointSpec::get("COMPANY_LIST", "/api/Company/GetCompanyList", "Company")
                    .context(Requires::USER, Upper)
            }
            Endpoint::EnvironmentList => EndpointSpec::get(
                "ENVIRONMENT_LIST",
                "/api/Company/GetEnvironmentList",
                "Environment",
            )
            .context(Requires::CMP | Requires::USER, Upper),
            Endpoint::CompanyDetails => {
                EndpointSpec::get("COMPANY_DETAILS", "/api/Company/GetCompanyDetails", "Company")
                    .context(Requires::CMP, Upper)
            }
            Endpoint::DepartmentList => EndpointSpec::get(
                "DEPARTMENT_LIST",
                "/api/Setup/GetDepartmentList",
                "Department",
            )
            .context(Requires::TENANT, Upper),
            Endpoint::DesignationList => EndpointSpec::get(
                "DESIGNATION_LIST",
                "/api/Setup/GetDesignationList",
                "Designation",
            )
            .context(Requires::TENANT, Upper),
            Endpoint::EmployeeList => {
                EndpointSpec::get("EMPLOYEE_LIST", "/api/Employee/GetList", "Employee")
                    .context(Requires::TENANT, Upper)
                    .paginated(Page::Lower)
            }
            Endpoint::CustomerList => {
                EndpointSpec::get("CUSTOMER_LIST", "/api/Customer/GetList", "Customer")
                    .context(Requires::TENANT, Upper)
                    .paginated(Page::Both)
            }
            Endpoint::VendorList => EndpointSpec::get("VENDOR_LIST", "/api/Vendor/GetList", "Vendor")
                .context(Requires::TENANT, Upper)
                .paginated(Page::Both),
            Endpoint::ItemList => EndpointSpec::get("ITEM_LIST", "/api/Item/GetList", "Item")
                .context(Requires::TENANT, Upper)
                .paginated(Page::Both),
            Endpoint::CurrencyList => {
                EndpointSpec::get("CURRENCY_LIST", "/api/Setup/GetCurrencyList", "Currency")
                    .context(Requires::TENANT, Upper)
            }
            Endpoint::TaxList => EndpointSpec::get("TAX_LIST", "/api/Setup/GetTaxList", "Tax")
                .context(Requires::TENANT, Upper),
            Endpoint::PaymentTermList => EndpointSpec::get(
                "PAYMENT_TERM_LIST",
                "/api/Setup/GetPaymentTermList",
                "Payment term",
            )
            .context(Requires::TENANT, Upper),
            Endpoint::ProjectList => {
                EndpointSpec::get("PROJECT_LIST", "/api/Project/GetList", "Project")
                    .context(Requires::ALL, Upper)
            }

            // -----------------------------------------------------------------
            // HR / attendance
            // -----------------------------------------------------------------
            Endpoint::CheckIn => EndpointSpec::post("CHECK_IN", "/api/Attendance/CheckIn", "Attendance")
                .context(Requires::ALL, Upper)
                .audited(),
            Endpoint::CheckOut => {
                EndpointSpec::post("CHECK_OUT", "/api/Attendance/CheckOut", "Attendance")
                    .context(Requires::ALL, Upper)
                    .audited()
            }
            Endpoint::AttendanceHistory => EndpointSpec::get(
                "ATTENDANCE_HISTORY",
                "/api/Attendance/GetHistory",
                "Attendance",
            )
            .context(Requires::ALL, Upper)
            .paginated(Page::Lower),
            Endpoint::AttendanceSummary => EndpointSpec::get(
                "ATTENDANCE_SUMMARY",
                "/api/Attendance/GetSummary",
                "Attendance",
            )
            .context(Requires::ALL, Upper),
            Endpoint::HolidayList => {
                EndpointSpec::get("HOLIDAY_LIST", "/api/HR/GetHolidayList", "Holiday")
                    .context(Requires::TENANT, Upper)
            }
            Endpoint::LeaveTypes => EndpointSpec::get("LEAVE_TYPES", "/api/Leave/GetLeaveTypes", "Leave")
                .context(Requires::TENANT, Upper),
            Endpoint::LeaveBalance => {
                EndpointSpec::get("LEAVE_BALANCE", "/api/Leave/GetLeaveBalance", "Leave")
                    .context(Requires::ALL, Upper)
            }
            Endpoint::ApplyLeave => EndpointSpec::post("APPLY_LEAVE", "/api/Leave/ApplyLeave", "Leave")
                .context(Requires::ALL, Upper)
                .audited(),
            Endpoint::LeaveList => EndpointSpec::get("LEAVE_LIST", "/api/Leave/GetList", "Leave")
                .context(Requires::ALL, Upper)
                .paginated(Page::Lower),
            Endpoint::CancelLeave => {
                EndpointSpec::delete("CANCEL_LEAVE", "/api/Leave/CancelLeave", "Leave")
                    .context(Requires::ALL, Upper)
                    .target(LEAVE_ID)
            }
            Endpoint::ApproveLeaveList => EndpointSpec::get(
                "APPROVE_LEAVE_LIST",
                "/api/Leave/GetHRAApproveLeaves",
                "Leave",
            )
            .context(Requires::ALL, Upper)
            .paginated(Page::Lower),
            Endpoint::ApproveLeave => {
                EndpointSpec::post("APPROVE_LEAVE", "/api/Leave/ApproveLeave", "Leave")
                    .context(Requires::ALL, Upper)
                    .target(LEAVE_ID)
                    .audited()
            }
            Endpoint::RejectLeave => EndpointSpec::post("REJECT_LEAVE", "/api/Leave/RejectLeave", "Leave")
                .context(Requires::ALL, Upper)
                .target(LEAVE_ID)
                .audited(),
            Endpoint::PayslipPdf => EndpointSpec::get("PAYSLIP_PDF", "/api/Payroll/GetPayslipPdf", "Payslip")
                .context(Requires::ALL, Upper)
                .document(),

            // -----------------------------------------------------------------
            // Lookups
            // -----------------------------------------------------------------
            Endpoint::ProjectTasks => {
                EndpointSpec::get("PROJECT_TASKS", "/api/Project/GetTasks", "Project task")
                    .context(Requires::TENANT, Upper)
            }
            Endpoint::ExpenseCategories => EndpointSpec::get(
                "EXPENSE_CATEGORIES",
                "/api/Expense/GetCategories",
                "Expense category",
            )
            .context(Requires::TENANT, Both),

            Endpoint::Document(kind, op) => document_spec(kind, op),

            // -----------------------------------------------------------------
            // Business development
            // -----------------------------------------------------------------
            Endpoint::LeadList => EndpointSpec::get("LEAD_LIST", "/api/BD/Lead/GetList", "Lead")
                .context(Requires::ALL, Lower)
                .paginated(Page::Both),
            Endpoint::LeadDetails => {
                EndpointSpec::get("LEAD_DETAILS", "/api/BD/Lead/GetDetails", "Lead")
                    .context(Requires::ALL, Lower)
                    .target(LEAD_ID)
            }
            Endpoint::AddLead => EndpointSpec::post("ADD_LEAD", "/api/BD/Lead/Add", "Lead")
                .context(Requires::ALL, Lower)
                .audited(),
            Endpoint::UpdateLead => EndpointSpec::post("UPDATE_LEAD", "/api/BD/Lead/Update", "Lead")
                .context(Requires::ALL, Lower)
                .target(LEAD_ID),
            Endpoint::UpdateLeadStatus => EndpointSpec::post(
                "UPDATE_LEAD_STATUS",
                "/api/BD/Lead/UpdateStatus",
                "Lead",
            )
            .context(Requires::ALL, Lower)
            .target(LEAD_STATUS_ID),
            Endpoint::DeleteLead => EndpointSpec::delete("DELETE_LEAD", "/api/BD/Lead/Delete", "Lead")
                .context(Requires::ALL, Lower)
                .target(LEAD_ID),
            Endpoint::LeadSources => {
                EndpointSpec::get("LEAD_SOURCES", "/api/BD/Lead/GetSources", "Lead source")
                    .context(Requires::TENANT, Lower)
            }
            Endpoint::LeadStatuses => {
                EndpointSpec::get("LEAD_STATUSES", "/api/BD/Lead/GetStatuses", "Lead status")
                    .context(Requires::TENANT, Lower)
            }
            Endpoint::LeadFollowUps => EndpointSpec::get(
                "LEAD_FOLLOW_UPS",
                "/api/BD/Lead/GetFollowUps",
                "Follow-up",
            )
            .context(Requires::ALL, Lower)
            .parent(PARENT_LEAD_ID),
            Endpoint::AddLeadFollowUp => EndpointSpec::post(
                "ADD_LEAD_FOLLOW_UP",
                "/api/BD/Lead/AddFollowUp",
                "Follow-up",
            )
            .context(Requires::ALL, Lower)
            .parent(PARENT_LEAD_ID),
            Endpoint::LeadProposals => EndpointSpec::get(
                "LEAD_PROPOSALS",
                "/api/BD/Lead/GetProposals",
                "Proposal",
            )
            .context(Requires::ALL, Lower)
            .parent(PARENT_LEAD_ID),
            Endpoint::AddLeadProposal => EndpointSpec::post(
                "ADD_LEAD_PROPOSAL",
                "/api/BD/Lead/AddProposal",
                "Proposal",
            )
            .context(Requires::ALL, Lower)
            .parent(PARENT_LEAD_ID)
            .multipart(),
        }
    }
}

// =============================================================================
// Path Table
// =============================================================================

/// Default paths plus configured overrides, keyed by endpoint key.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    overrides: HashMap<String, String>,
}

impl PathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `key → path` overrides. Paths gain a leading `/`
    /// when missing.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = PathTable::new();
        for (key, path) in overrides {
            table.set_override(key, path);
        }
        table
    }

    pub fn set_override(&mut self, key: impl Into<String>, path: impl Into<String>) {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self.overrides.insert(key.into(), path);
    }

    /// The path to call for `spec`.
    pub fn resolve<'a>(&'a self, spec: &'a EndpointSpec) -> &'a str {
        self.overrides
            .get(spec.key.as_ref())
            .map(String::as_str)
            .unwrap_or_else(|| spec.default_path.as_ref())
    }

    /// Override keys that do not name any endpoint (likely typos).
    pub fn unknown_keys(&self) -> Vec<String> {
        let known: Vec<EndpointSpec> = Endpoint::all().iter().map(Endpoint::spec).collect();
        let mut unknown: Vec<String> = self
            .overrides
            .keys()
            .filter(|key| !known.iter().any(|spec| spec.key == key.as_str()))
            .cloned()
            .collect();
        unknown.sort();
        unknown
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keys_unique() {
        let mut keys: Vec<String> = Endpoint::all()
            .iter()
            .map(|e| e.spec().key.into_owned())
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, FIXED_ENDPOINTS.len() + 6 * 11);
    }

    #[test]
    fn test_default_paths_are_api_paths() {
        for endpoint in Endpoint::all() {
            let spec = endpoint.spec();
            assert!(
                spec.default_path.starts_with("/api/"),
                "{} has path {}",
                spec.key,
                spec.default_path
            );
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Endpoint::from_key("LOGIN"), Some(Endpoint::Login));
        assert_eq!(
            Endpoint::from_key("PURCHASE_ORDER_DELETE_LINE"),
            Some(Endpoint::Document(DocumentKind::PurchaseOrder, DocumentOp::DeleteLine))
        );
        assert_eq!(Endpoint::from_key("NOPE"), None);
    }

    #[test]
    fn test_auth_endpoints_are_public() {
        for endpoint in [Endpoint::Login, Endpoint::RefreshToken, Endpoint::KspAuth] {
            let spec = endpoint.spec();
            assert!(!spec.authenticated);
            assert!(spec.context.requires.is_empty());
        }
        assert!(Endpoint::LeadList.spec().authenticated);
    }

    #[test]
    fn test_document_delete_line_descriptor() {
        let spec = Endpoint::Document(DocumentKind::PurchaseOrder, DocumentOp::DeleteLine).spec();
        assert_eq!(spec.method, HttpMethod::Delete);
        assert_eq!(spec.default_path, "/api/PurchaseOrder/DeleteLine");
        assert_eq!(spec.target, Some(LINE_ID));
        assert_eq!(spec.body, BodyEncoding::None);
        assert_eq!(spec.context.requires, Requires::ALL);
    }

    #[test]
    fn test_expense_lines_are_multipart() {
        let add = Endpoint::Document(DocumentKind::Expense, DocumentOp::AddLine).spec();
        let update = Endpoint::Document(DocumentKind::Expense, DocumentOp::UpdateLine).spec();
        let sales = Endpoint::Document(DocumentKind::SalesOrder, DocumentOp::AddLine).spec();
        assert_eq!(add.body, BodyEncoding::Multipart);
        assert_eq!(update.body, BodyEncoding::Multipart);
        assert_eq!(sales.body, BodyEncoding::Json);
    }

    #[test]
    fn test_pdf_endpoints_are_documents() {
        for kind in DocumentKind::ALL {
            let spec = Endpoint::Document(kind, DocumentOp::Pdf).spec();
            assert_eq!(spec.response, ResponseKind::Document);
            assert_eq!(spec.entity, kind.entity());
        }
        assert_eq!(Endpoint::PayslipPdf.spec().response, ResponseKind::Document);
    }

    #[test]
    fn test_delete_endpoints_carry_a_target() {
        for endpoint in Endpoint::all() {
            let spec = endpoint.spec();
            if spec.method == HttpMethod::Delete {
                let target = spec.target.expect("delete without target");
                assert!(target.aliases.len() >= 3, "{} aliases", spec.key);
            }
        }
    }

    #[test]
    fn test_lead_status_uses_lowercase_keys() {
        let spec = Endpoint::UpdateLeadStatus.spec();
        assert_eq!(spec.context.casing, KeyCasing::Lower);
        assert_eq!(spec.target.unwrap().aliases, &["uuid"]);
    }

    #[test]
    fn test_path_table_overrides() {
        let table = PathTable::with_overrides([
            ("LOGIN", "api/v2/Auth/Login"),
            ("LOGINN", "/typo"),
        ]);
        let login = Endpoint::Login.spec();
        let leads = Endpoint::LeadList.spec();

        assert_eq!(table.resolve(&login), "/api/v2/Auth/Login");
        assert_eq!(table.resolve(&leads), "/api/BD/Lead/GetList");
        assert_eq!(table.unknown_keys(), vec!["LOGINN".to_string()]);
    }

    #[test]
    fn test_key_casing_sets() {
        assert_eq!(KeyCasing::Both.cmp_keys(), &["cmpuuid", "CMPUUID"]);
        assert_eq!(KeyCasing::Upper.user_keys(), &["UserUUID"]);
        assert_eq!(PaginationStyle::Both.key_sets().len(), 2);
        assert!(PaginationStyle::None.key_sets().is_empty());
    }
}
