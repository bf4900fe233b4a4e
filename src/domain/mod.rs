// Domain types shared by the store, the workflows and the CLI

pub mod images;
pub mod models;
pub mod status;

pub use images::{ImageSlot, ImageSlots, ImageUpload, SLOT_COUNT};
pub use models::{
    AccountType, Admin, AdminSignupRequest, AdminUpdate, ApplicationStatus, AuthLevel,
    AuthLevelResponse, AvailableSlotsResponse, ConnectRequest, ConnectRequestBody,
    ConnectionStatus, DashboardSummary, LoginRequest, LoginResponse, ProfileImage,
    ProfileImagesResponse, ProfileUpdate, SignupRequest, SignupResponse, StatusChange,
    TransitionResponse, UploadResponse, User, UserRequest,
};
pub use status::{
    ConnectAction, ConnectRequestStatus, ReviewDecision, TransitionError, UnknownStatus,
    UserStatus,
};
