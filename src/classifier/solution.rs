//! Canned first-line remediation text

use super::Category;

const PRINTER: &str = "Try power-cycling the printer, confirm it shows as online, and clear any stuck print jobs. Check for paper jams and toner warnings before a technician is dispatched.";
const DISPLAY: &str = "Check that the display cable is firmly seated at both ends and that the monitor is powered on. Try another cable or port if one is available.";
const HARDWARE: &str = "Restart the device and make sure all cables are securely connected. If the problem persists a technician will inspect the hardware.";
const INSTALL: &str = "Software installs and updates are handled by IT. A technician will push the package remotely; please leave the computer powered on and logged in.";
const CRASH: &str = "Save your work, close the application and reopen it. If it keeps failing, restart the computer and note any error message shown.";
const SOFTWARE: &str = "Close and reopen the application, then restart your computer if the problem continues. Note any error messages for the technician.";
const WIRELESS: &str = "Turn Wi-Fi off and on again and reconnect to the staff network. If nearby devices are also affected, the access point may need attention.";
const NETWORK: &str = "Check that the network cable is plugged in and restart your computer. If several workstations are affected, IT will investigate the network equipment.";
const PASSWORD: &str = "Use the self-service password reset portal, or IT can reset your password after verifying your identity by phone.";
const ACCESS: &str = "IT will review your account permissions and update access once your department manager approves.";
const OUTLOOK: &str = "Restart Outlook and check whether webmail works. If webmail works, IT will repair your Outlook profile.";
const EMAIL: &str = "Check your connection and try sending yourself a test message. IT will verify the mailbox configuration.";
const CLINICAL: &str = "Log out of the clinical application and back in. If the problem continues, follow your department's downtime procedures while IT contacts the vendor.";
const SECURITY: &str = "Disconnect the affected computer from the network immediately and do not enter any credentials. IT security will contact you right away.";
const GENERAL: &str = "Please provide more details about the issue so our IT team can suggest a solution.";

fn mentions(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lower.contains(w))
}

/// Pick remediation text for `category`, refined by keywords in `text`
pub fn suggest_solution(text: &str, category: Category) -> &'static str {
    let lower = text.to_lowercase();
    match category {
        Category::Hardware if mentions(&lower, &["printer", "print"]) => PRINTER,
        Category::Hardware if mentions(&lower, &["monitor", "screen", "display"]) => DISPLAY,
        Category::Hardware => HARDWARE,
        Category::Software if mentions(&lower, &["install", "update"]) => INSTALL,
        Category::Software
            if mentions(&lower, &["crash", "frozen", "freez", "not responding"]) =>
        {
            CRASH
        }
        Category::Software => SOFTWARE,
        Category::Network if mentions(&lower, &["wifi", "wi-fi", "wireless"]) => WIRELESS,
        Category::Network => NETWORK,
        Category::Access if lower.contains("password") => PASSWORD,
        Category::Access => ACCESS,
        Category::Email if lower.contains("outlook") => OUTLOOK,
        Category::Email => EMAIL,
        Category::ClinicalSoftware => CLINICAL,
        Category::Security => SECURITY,
        Category::General => GENERAL,
    }
}
