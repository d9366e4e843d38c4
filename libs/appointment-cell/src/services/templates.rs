// libs/appointment-cell/src/services/templates.rs
//
// HTML bodies for the booking and status emails. Interpolated fields come
// from the appointment record, so the doctor name is always the snapshot
// taken at booking time.

use crate::models::{Appointment, AppointmentStatus};

const SIGNATURE: &str = "<hr>\n<p>Thank you,<br/>Medora Team<br/>Hetauda Hospital</p>";

pub fn booking_received_email(appointment: &Appointment) -> (String, String) {
    let subject = "Your Appointment Request Has Been Received".to_string();
    let html = format!(
        "<h2>Medora - Hetauda Hospital</h2>\n\
         <p>Dear {},</p>\n\
         <p>Your appointment request for the {} department on <b>{}</b> has been received.</p>\n\
         <p>We will notify you once Dr. {} reviews your request.</p>\n\
         {}",
        appointment.first_name,
        appointment.department,
        appointment.appointment_date,
        appointment.doctor.full_name(),
        SIGNATURE
    );
    (subject, html)
}

pub fn patient_status_email(
    appointment: &Appointment,
    status: AppointmentStatus,
) -> (String, String) {
    match status {
        AppointmentStatus::Accepted => {
            let subject = "Your Appointment Has Been Accepted".to_string();
            let html = format!(
                "<h2>Medora - Hetauda Hospital</h2>\n\
                 <p>Dear {},</p>\n\
                 <p>Your appointment with Dr. {} on <b>{}</b> has been <b>Accepted</b>.</p>\n\
                 <p>Please arrive fifteen minutes early and bring any previous medical records.</p>\n\
                 {}",
                appointment.first_name,
                appointment.doctor.full_name(),
                appointment.appointment_date,
                SIGNATURE
            );
            (subject, html)
        }
        AppointmentStatus::Rejected => {
            let subject = "Your Appointment Has Been Rejected".to_string();
            let html = format!(
                "<h2>Medora - Hetauda Hospital</h2>\n\
                 <p>Dear {},</p>\n\
                 <p>We are sorry, your appointment request for <b>{}</b> has been <b>Rejected</b>.</p>\n\
                 <p>Please contact the hospital to arrange an alternative date or doctor.</p>\n\
                 {}",
                appointment.first_name, appointment.appointment_date, SIGNATURE
            );
            (subject, html)
        }
        AppointmentStatus::Pending => {
            let subject = "Your Appointment Status Update".to_string();
            let html = format!(
                "<h2>Medora - Hetauda Hospital</h2>\n\
                 <p>Dear {},</p>\n\
                 <p>Your appointment status has been updated to: <b>{}</b>.</p>\n\
                 <p>We will be happy to serve you at Hetauda Hospital.</p>\n\
                 {}",
                appointment.first_name, status, SIGNATURE
            );
            (subject, html)
        }
    }
}

pub fn doctor_assignment_email(appointment: &Appointment) -> (String, String) {
    let subject = "New Patient Appointment Assigned".to_string();
    let html = format!(
        "<h2>Medora - Hetauda Hospital</h2>\n\
         <p>Dear Dr. {},</p>\n\
         <p>The appointment of {} in the {} department on <b>{}</b> has been accepted and assigned to you.</p>\n\
         <p>Patient contact: {} / {}</p>\n\
         {}",
        appointment.doctor.last_name,
        appointment.patient_full_name(),
        appointment.department,
        appointment.appointment_date,
        appointment.email,
        appointment.phone,
        SIGNATURE
    );
    (subject, html)
}
