use utoipa::OpenApi;

use crate::{
    api::models::{ErrorResponse, ExportQuery},
    core::{
        calculations::SessionSnapshot,
        messages::{MemberView, SessionView},
        models::{
            AppLog, CategoryTotal, Expense, ExpenseSummary, Member, MemberBalance, MemberGroup, NewExpense, NewMember,
            Session, Settlement,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_session,
        super::handlers::get_session,
        super::handlers::get_snapshot,
        super::handlers::export_session,
        super::handlers::get_session_logs,
        super::handlers::get_app_logs
    ),
    components(schemas(
        ExportQuery,
        ErrorResponse,
        Session,
        SessionView,
        MemberView,
        Member,
        NewMember,
        Expense,
        NewExpense,
        MemberGroup,
        MemberBalance,
        Settlement,
        SessionSnapshot,
        ExpenseSummary,
        CategoryTotal,
        AppLog
    )),
    info(
        title = "BillSplit API",
        description = "Shared sessions for splitting bills; live edits go over the /ws WebSocket",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
