//! Self-help articles shown to anyone, logged in or not.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Topic {
    Hardware,
    Software,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Hardware => "Hardware",
            Topic::Software => "Software",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Article {
    pub id: u32,
    pub question: &'static str,
    pub topic: Topic,
    pub answer: &'static str,
}

pub const ARTICLES: [Article; 25] = [
    Article {
        id: 1,
        question: "How to install RAM?",
        topic: Topic::Hardware,
        answer: "To install RAM, open your computer case, locate the RAM slots on the motherboard, and carefully insert the RAM stick.",
    },
    Article {
        id: 2,
        question: "What is an SSD?",
        topic: Topic::Hardware,
        answer: "An SSD (Solid State Drive) is a type of storage device that uses flash memory to store data.",
    },
    Article {
        id: 3,
        question: "How to install software on Windows?",
        topic: Topic::Software,
        answer: "To install software on Windows, download the installer, run the .exe file, and follow the on-screen instructions.",
    },
    Article {
        id: 4,
        question: "What is a firewall?",
        topic: Topic::Software,
        answer: "A firewall is a security system that monitors and controls incoming and outgoing network traffic based on predetermined security rules.",
    },
    Article {
        id: 5,
        question: "How to replace a hard drive?",
        topic: Topic::Hardware,
        answer: "To replace a hard drive, power off the computer, open the case, disconnect the cables, remove the old hard drive, and install the new one.",
    },
    Article {
        id: 6,
        question: "What is a GPU?",
        topic: Topic::Hardware,
        answer: "A GPU (Graphics Processing Unit) is a specialized processor designed to accelerate rendering of images and videos.",
    },
    Article {
        id: 7,
        question: "How to set up a wireless network?",
        topic: Topic::Software,
        answer: "To set up a wireless network, connect the router to the modem, log into the router settings, and configure your wireless network name (SSID) and password.",
    },
    Article {
        id: 8,
        question: "What is BIOS?",
        topic: Topic::Hardware,
        answer: "BIOS (Basic Input/Output System) is firmware used to initialize and test hardware during booting and to load the operating system.",
    },
    Article {
        id: 9,
        question: "How to format a USB drive?",
        topic: Topic::Software,
        answer: "To format a USB drive, insert it into the computer, right-click the drive icon, select \"Format,\" choose the file system, and click \"Start.\"",
    },
    Article {
        id: 10,
        question: "What is a VPN?",
        topic: Topic::Software,
        answer: "A VPN (Virtual Private Network) provides a secure connection to another network over the Internet by encrypting your connection.",
    },
    Article {
        id: 11,
        question: "How to check for hardware compatibility?",
        topic: Topic::Hardware,
        answer: "To check for hardware compatibility, consult the motherboard’s manual or specifications to ensure that new hardware is supported.",
    },
    Article {
        id: 12,
        question: "How to create a backup of important files?",
        topic: Topic::Software,
        answer: "To create a backup, use a backup utility or cloud storage to copy important files to an external drive or online storage service.",
    },
    Article {
        id: 13,
        question: "What is a driver?",
        topic: Topic::Software,
        answer: "A driver is a piece of software that allows the operating system to communicate with hardware devices like printers, GPUs, and network cards.",
    },
    Article {
        id: 14,
        question: "How to clean a computer?",
        topic: Topic::Hardware,
        answer: "To clean a computer, power it off, open the case, and use compressed air to remove dust from fans, heatsinks, and other components.",
    },
    Article {
        id: 15,
        question: "What is an IP address?",
        topic: Topic::Software,
        answer: "An IP address (Internet Protocol address) is a unique string of numbers that identifies a device on a network.",
    },
    Article {
        id: 16,
        question: "How to upgrade a CPU?",
        topic: Topic::Hardware,
        answer: "To upgrade a CPU, ensure your motherboard supports the new CPU, power off the system, remove the old CPU, install the new one, and reapply thermal paste.",
    },
    Article {
        id: 17,
        question: "How to remove malware from a computer?",
        topic: Topic::Software,
        answer: "To remove malware, run an antivirus scan, use malware removal tools, and reset the browser settings if necessary.",
    },
    Article {
        id: 18,
        question: "What is a power supply unit (PSU)?",
        topic: Topic::Hardware,
        answer: "A PSU (Power Supply Unit) is a component that converts electricity from the wall socket into the correct voltage for the computer’s components.",
    },
    Article {
        id: 19,
        question: "How to install a printer on Windows?",
        topic: Topic::Software,
        answer: "To install a printer on Windows, connect it to the computer or network, and use the Add Printer wizard in the Control Panel or Settings.",
    },
    Article {
        id: 20,
        question: "What is cloud storage?",
        topic: Topic::Software,
        answer: "Cloud storage allows users to store data on remote servers accessed over the Internet, offering secure backup and access from anywhere.",
    },
    Article {
        id: 21,
        question: "How to partition a hard drive?",
        topic: Topic::Software,
        answer: "To partition a hard drive, use the Disk Management tool on Windows or Disk Utility on macOS to create, delete, and manage partitions.",
    },
    Article {
        id: 22,
        question: "What is RAID?",
        topic: Topic::Hardware,
        answer: "RAID (Redundant Array of Independent Disks) is a technology that combines multiple hard drives into a single unit for redundancy or performance.",
    },
    Article {
        id: 23,
        question: "How to recover lost data?",
        topic: Topic::Software,
        answer: "To recover lost data, use data recovery software like Recuva or EaseUS, or consult professional data recovery services if the data is critical.",
    },
    Article {
        id: 24,
        question: "What is overclocking?",
        topic: Topic::Hardware,
        answer: "Overclocking is the process of increasing the clock speed of a computer component, such as the CPU or GPU, to improve performance.",
    },
    Article {
        id: 25,
        question: "How to connect a computer to a projector?",
        topic: Topic::Hardware,
        answer: "To connect a computer to a projector, use an HDMI or VGA cable, set the correct input on the projector, and configure the display settings on the computer.",
    },
];

/// 依主題篩選，`None` 代表全部
pub fn articles(topic: Option<Topic>) -> impl Iterator<Item = &'static Article> {
    ARTICLES
        .iter()
        .filter(move |article| topic.map_or(true, |topic| article.topic == topic))
}
