// Macros file - tracing macros are referenced by full path inside the definitions

/// Shared logging macros so every layer emits the same field names and
/// message shapes.
///
/// Keeping these in one place gives us:
/// - one spelling for each structured field (operation, section_id, ...)
/// - predictable levels per event kind
/// - log lines that are grep-able across api, service, and database layers

// ============================================================================
// API Operation Logging Macros
// ============================================================================

/// Log the start of an API operation with consistent fields
#[macro_export]
macro_rules! log_api_start {
    ($operation:expr, lesson_id = $lesson_id:expr) => {
        tracing::debug!(
            operation = $operation,
            lesson_id = %$lesson_id,
            "API operation started"
        );
    };
    ($operation:expr, section_id = $section_id:expr) => {
        tracing::debug!(
            operation = $operation,
            section_id = %$section_id,
            "API operation started"
        );
    };
    ($operation:expr, question_id = $question_id:expr) => {
        tracing::debug!(
            operation = $operation,
            question_id = %$question_id,
            "API operation started"
        );
    };
    ($operation:expr) => {
        tracing::debug!(
            operation = $operation,
            "API operation started"
        );
    };
}

/// Log successful completion of an API operation
#[macro_export]
macro_rules! log_api_success {
    ($operation:expr, lesson_id = $lesson_id:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            lesson_id = %$lesson_id,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, section_id = $section_id:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            section_id = %$section_id,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, question_id = $question_id:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            question_id = %$question_id,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, count = $count:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            count = $count,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            "API operation completed: {}", $msg
        );
    };
}

/// Log API operation errors with consistent structure
#[macro_export]
macro_rules! log_api_error {
    ($operation:expr, lesson_id = $lesson_id:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            lesson_id = %$lesson_id,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, section_id = $section_id:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            section_id = %$section_id,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, question_id = $question_id:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            question_id = %$question_id,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
}

/// Log API warnings with context
#[macro_export]
macro_rules! log_api_warn {
    ($operation:expr, lesson_id = $lesson_id:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            lesson_id = %$lesson_id,
            "API operation warning: {}", $msg
        );
    };
    ($operation:expr, section_id = $section_id:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            section_id = %$section_id,
            "API operation warning: {}", $msg
        );
    };
    ($operation:expr, question_id = $question_id:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            question_id = %$question_id,
            "API operation warning: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            "API operation warning: {}", $msg
        );
    };
}

// ============================================================================
// Service Layer Logging Macros
// ============================================================================

/// Log service operation start with context
#[macro_export]
macro_rules! log_service_start {
    ($service:expr, $operation:expr, question_count = $count:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            question_count = $count,
            "Service operation started"
        );
    };
    ($service:expr, $operation:expr, section_id = $section_id:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            section_id = %$section_id,
            "Service operation started"
        );
    };
    ($service:expr, $operation:expr, lesson_id = $lesson_id:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            lesson_id = %$lesson_id,
            "Service operation started"
        );
    };
    ($service:expr, $operation:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            "Service operation started"
        );
    };
}

/// Log service operation success
#[macro_export]
macro_rules! log_service_success {
    ($service:expr, $operation:expr, question_count = $count:expr, $msg:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            question_count = $count,
            "Service operation completed: {}", $msg
        );
    };
    ($service:expr, $operation:expr, section_id = $section_id:expr, $msg:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            section_id = %$section_id,
            "Service operation completed: {}", $msg
        );
    };
    ($service:expr, $operation:expr, $msg:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            "Service operation completed: {}", $msg
        );
    };
}

/// Log service operation errors
#[macro_export]
macro_rules! log_service_error {
    ($service:expr, $operation:expr, section_id = $section_id:expr, error = $error:expr) => {
        tracing::error!(
            service = $service,
            operation = $operation,
            section_id = %$section_id,
            error = %$error,
            "Service operation failed"
        );
    };
    ($service:expr, $operation:expr, question_id = $question_id:expr, error = $error:expr) => {
        tracing::error!(
            service = $service,
            operation = $operation,
            question_id = %$question_id,
            error = %$error,
            "Service operation failed"
        );
    };
    ($service:expr, $operation:expr, error = $error:expr) => {
        tracing::error!(
            service = $service,
            operation = $operation,
            error = %$error,
            "Service operation failed"
        );
    };
}

/// Log service warnings
#[macro_export]
macro_rules! log_service_warn {
    ($service:expr, $operation:expr, $msg:expr) => {
        tracing::warn!(
            service = $service,
            operation = $operation,
            "Service warning: {}",
            $msg
        );
    };
}

// ============================================================================
// Database Operation Logging Macros
// ============================================================================

/// Log database operation performance and results
#[macro_export]
macro_rules! log_db_operation {
    (debug, $operation:expr, section_id = $section_id:expr, duration_ms = $duration:expr) => {
        tracing::debug!(
            component = "database",
            operation = $operation,
            section_id = %$section_id,
            duration_ms = $duration,
            "Database operation completed"
        );
    };
    (debug, $operation:expr, count = $count:expr, duration_ms = $duration:expr) => {
        tracing::debug!(
            component = "database",
            operation = $operation,
            result_count = $count,
            duration_ms = $duration,
            "Database operation completed"
        );
    };
    (info, $operation:expr, $msg:expr) => {
        tracing::info!(
            component = "database",
            operation = $operation,
            "Database operation: {}", $msg
        );
    };
    (error, $operation:expr, error = $error:expr) => {
        tracing::error!(
            component = "database",
            operation = $operation,
            error = %$error,
            "Database operation failed"
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    #[test]
    fn test_logging_macros_compile() {
        let lesson_id = Uuid::new_v4();
        let section_id = Uuid::new_v4();
        let question_id = Uuid::new_v4();
        let error = anyhow::anyhow!("test error");

        // Test that all macro variants compile successfully
        log_api_start!("test_operation", lesson_id = lesson_id);
        log_api_start!("test_operation", section_id = section_id);
        log_api_start!("test_operation", question_id = question_id);
        log_api_start!("test_operation");

        log_api_success!("test_operation", lesson_id = lesson_id, "lesson processed");
        log_api_success!("test_operation", section_id = section_id, "section processed");
        log_api_success!("test_operation", question_id = question_id, "question processed");
        log_api_success!("test_operation", count = 5, "questions processed");
        log_api_success!("test_operation", "operation completed");

        log_api_error!("test_operation", lesson_id = lesson_id, error = error, "lesson failure");
        log_api_error!("test_operation", section_id = section_id, error = error, "section failure");
        log_api_error!("test_operation", question_id = question_id, error = error, "question failure");
        log_api_error!("test_operation", error = error, "general failure");

        log_api_warn!("test_operation", lesson_id = lesson_id, "lesson warning");
        log_api_warn!("test_operation", section_id = section_id, "section warning");
        log_api_warn!("test_operation", question_id = question_id, "question warning");
        log_api_warn!("test_operation", "general warning");

        log_service_start!("exercise_service", "create_question", question_count = 3);
        log_service_start!("exercise_service", "create_question", section_id = section_id);
        log_service_start!("exercise_service", "get_lesson_exercises", lesson_id = lesson_id);
        log_service_start!("lesson_service", "create_lesson");

        log_service_success!("exercise_service", "bulk_create", question_count = 3, "bulk create finished");
        log_service_success!("exercise_service", "recompute", section_id = section_id, "totals recomputed");
        log_service_success!("lesson_service", "create_lesson", "lesson created");

        log_service_error!("exercise_service", "recompute", section_id = section_id, error = error);
        log_service_error!("exercise_service", "update_question", question_id = question_id, error = error);
        log_service_error!("lesson_service", "create_lesson", error = error);

        log_service_warn!("exercise_service", "bulk_create", "some questions failed");

        log_db_operation!(debug, "select_section", section_id = section_id, duration_ms = 10);
        log_db_operation!(debug, "select_questions", count = 4, duration_ms = 12);
        log_db_operation!(info, "migration", "database initialized");
        log_db_operation!(error, "update_section", error = error);

        log_system_event!(startup, component = "server", "server starting");
        log_system_event!(shutdown, component = "server", "server stopping");
        log_system_event!(config, "configuration loaded successfully");

        log_validation!(success, "api_request", "request validated");
        log_validation!(failure, "api_request", error = error);
    }
}
